use penmark_logger::{Logger, LoggerError};

#[test]
fn second_install_is_a_subscriber_error() {
    let _logger = Logger::builder("penmark-init-twice").init().expect("first init should succeed");

    let err = Logger::builder("penmark-init-twice-second")
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "got {err}");
    assert!(err.to_string().contains("Installing the global subscriber"));
}
