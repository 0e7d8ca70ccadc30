use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pxconv operations
#[derive(Error, Diagnostic, Debug)]
pub enum ConvError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pxconv::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pxconv::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Palette error: {message}")]
    #[diagnostic(code(pxconv::palette))]
    Palette {
        path: Option<std::path::PathBuf>,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Cannot decode image {path}: {message}")]
    #[diagnostic(
        code(pxconv::decode),
        help("Supported formats are PNG, JPEG, BMP and GIF")
    )]
    ImageDecode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Processing error: {message}")]
    #[diagnostic(code(pxconv::process))]
    Processing {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(pxconv::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl ConvError {
    /// Shorthand for a palette error without a source path.
    pub(crate) fn palette(message: impl Into<String>) -> Self {
        ConvError::Palette {
            path: None,
            message: message.into(),
            help: None,
        }
    }

    /// Shorthand for a processing error without help text.
    pub(crate) fn processing(message: impl Into<String>) -> Self {
        ConvError::Processing {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvError>;
