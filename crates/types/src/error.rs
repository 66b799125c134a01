use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Index [{0}] is not valid.")]
    InvalidColumnIndex(usize),

    #[error("Unsupported {kind} value: '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}
