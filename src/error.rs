use thiserror::Error;

/// Local failures, raised before anything is sent to the link service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Slug creation: please provide a slug (max. 64).")]
    SlugLength(usize),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid date or time: {0}")]
    InvalidDateTime(String),

    #[error("No link with the slug '{0}' in the listing")]
    UnknownSlug(String),

    #[error("No link is being edited")]
    NoEditForm,

    #[error("Invalid seed line {line}: {reason}")]
    InvalidSeed { line: u64, reason: String },
}

#[derive(Error, Debug)]
pub enum PresenterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-2xx answer of the link service, carrying its plain-text message.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Could not reach the link service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("QR code generation error: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

impl PresenterError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PresenterError::Validation(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, PresenterError::Server { .. })
    }
}

pub type Result<T> = std::result::Result<T, PresenterError>;
