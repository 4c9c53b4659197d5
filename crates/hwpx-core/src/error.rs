use thiserror::Error;

#[derive(Error, Debug)]
pub enum HwpxError {
    #[error("Invalid HWPX package: {message}")]
    Format { message: String },

    #[error("Missing required part '{part_path}'")]
    MissingPart { part_path: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Unsupported content: {message}")]
    UnsupportedContent { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

impl HwpxError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Promote a tree-level parse failure of a structural part to a format error.
    pub(crate) fn into_format(self, part_path: &str) -> Self {
        match self {
            Self::XmlParse { message, location } => Self::Format {
                message: format!("malformed {part_path} ({location}): {message}"),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, HwpxError>;
