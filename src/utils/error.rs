use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("QR encoding error: {0}")]
    QrEncodeError(#[from] qrcode::types::QrError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input not found: {path}")]
    MissingInputError { path: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Nothing to do: {message}")]
    NothingToDo { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Encoding,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ToolError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::MissingInputError { .. } | Self::NothingToDo { .. } | Self::CsvError(_) => {
                ErrorCategory::Input
            }
            Self::ImageError(_) | Self::QrEncodeError(_) => ErrorCategory::Encoding,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NothingToDo { .. } => ErrorSeverity::Low,
            // 單行失敗，可修正後重跑
            Self::QrEncodeError(_) | Self::ImageError(_) => ErrorSeverity::Medium,
            Self::IoError(e) if e.kind() == std::io::ErrorKind::StorageFull => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the configuration file and command-line flags"
            }
            Self::MissingInputError { .. } => {
                "Make sure the input path exists or drop --require-root"
            }
            Self::NothingToDo { .. } => "Add data to the input and run again",
            Self::QrEncodeError(_) => {
                "Shorten the payload or lower the error-correction level with --ec-level"
            }
            Self::ImageError(_) => "Check the render settings (--module-size, --quiet-zone)",
            Self::IoError(_) => "Check file permissions and free disk space, then re-run",
            Self::CsvError(_) => "Check that the CSV has a header row and consistent columns",
            Self::SerializationError(_) => "Check that the input is valid JSON",
            Self::ProcessingError { .. } => "Fix the reported row or line and re-run",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File system error: {}", e),
            Self::MissingInputError { path } => format!("'{}' does not exist", path),
            Self::NothingToDo { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Process exit code for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_do_is_low_severity() {
        let err = ToolError::NothingToDo {
            message: "empty template".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.exit_code(), 0);
        assert_eq!(err.user_friendly_message(), "empty template");
    }

    #[test]
    fn test_config_errors_are_configuration_category() {
        let err = ToolError::InvalidConfigValueError {
            field: "render.module_size".to_string(),
            value: "0".to_string(),
            reason: "must be between 1 and 100".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ToolError = io.into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert!(err.user_friendly_message().contains("denied"));
    }
}
