use thiserror::Error;

use crate::term::Rule;

#[derive(Error, Debug)]
pub enum KispError {
    #[error("Malformed term: {0}")]
    MalformedTerm(String),
    #[error("Arity mismatch: {0}")]
    Arity(String),
    #[error("Type mismatch: {0}")]
    Type(String),
    #[error("Domain error: {0}")]
    Domain(String),
    #[error("Redefinition: {0}")]
    Redefinition(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl KispError {
    /// True for the failures a user causes by writing a bad term, as opposed
    /// to failures of the surrounding machinery.
    pub fn is_language_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedTerm(_) | Self::Arity(_) | Self::Type(_) | Self::Domain(_) | Self::Redefinition(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KispError>;

// Helper conversions
impl From<std::io::Error> for KispError {
    fn from(e: std::io::Error) -> Self { Self::Persistence(e.to_string()) }
}

impl From<serde_json::Error> for KispError {
    fn from(e: serde_json::Error) -> Self { Self::Persistence(e.to_string()) }
}

impl From<config::ConfigError> for KispError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl From<pest::error::Error<Rule>> for KispError {
    fn from(e: pest::error::Error<Rule>) -> Self { Self::MalformedTerm(e.to_string()) }
}
