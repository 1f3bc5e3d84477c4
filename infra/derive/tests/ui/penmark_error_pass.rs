use penmark_derive::penmark_error;
use std::borrow::Cow;

#[penmark_error]
pub enum RecordError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Record is empty{}", format_context(.context))]
    Empty { context: Option<Cow<'static, str>> },
}

fn read(path: &str) -> Result<String, RecordError> {
    let raw = std::fs::read_to_string(path).context("Reading record")?;
    if raw.is_empty() {
        return Err(RecordError::Empty { context: None }).context(path.to_owned());
    }
    Ok(raw)
}

fn main() {
    let _ = read("missing.json");
}
