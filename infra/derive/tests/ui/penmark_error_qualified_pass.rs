mod first {
    #[penmark_derive::penmark_error]
    pub enum QuotaError {
        #[error("Bad quota{}: {source}", format_context(.context))]
        Parse {
            source: std::num::ParseIntError,
            context: ::std::option::Option<::std::borrow::Cow<'static, str>>,
        },
    }
}

mod second {
    #[penmark_derive::penmark_error]
    pub enum ClockError {
        #[error("Bad timestamp{}: {source}", format_context(context))]
        Parse { source: std::num::ParseIntError, context: Option<std::borrow::Cow<'static, str>> },
    }
}

use first::QuotaErrorExt as _;
use second::ClockErrorExt as _;

fn quota(raw: &str) -> Result<u64, first::QuotaError> {
    Ok(raw.parse::<u64>()?)
}

fn timestamp(raw: &str) -> Result<i64, second::ClockError> {
    second::ClockErrorExt::context(raw.parse::<i64>(), "Reading expiry")
}

fn main() {
    let _ = quota("5");
    let _ = timestamp("soon");
}
