use thiserror::Error;

/// Exit status reserved for a missing input list.
pub const EXIT_SOURCE_NOT_FOUND: i32 = 5;

#[derive(Error, Debug)]
pub enum BingoError {
    #[error("Input file {path} doesn't exist")]
    SourceNotFound { path: String },

    #[error("Malformed entry on line {line}: {content:?} (expected \"Song-Artist\")")]
    MalformedEntry { line: usize, content: String },

    #[error("Not enough entries for a card: {available} available, {required} required")]
    InsufficientEntries { available: usize, required: usize },

    #[error("Cannot save to {path}: {message}")]
    SaveFailure { path: String, message: String },

    #[error("Rendering card #{card_number} failed: {message}")]
    RenderError { card_number: u32, message: String },

    #[error("Font {name} unavailable: {message}")]
    FontError { name: String, message: String },

    #[error("Card task failed: {0}")]
    TaskError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Layout,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Affects one card only; the batch continues.
    Low,
    High,
    Critical,
}

impl BingoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BingoError::SourceNotFound { .. } | BingoError::MalformedEntry { .. } => {
                ErrorCategory::Input
            }
            BingoError::InsufficientEntries { .. } => ErrorCategory::Layout,
            BingoError::SaveFailure { .. }
            | BingoError::RenderError { .. }
            | BingoError::FontError { .. } => ErrorCategory::Output,
            BingoError::ConfigError { .. }
            | BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BingoError::TaskError(_) | BingoError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BingoError::SaveFailure { .. }
            | BingoError::RenderError { .. }
            | BingoError::FontError { .. }
            | BingoError::TaskError(_) => ErrorSeverity::Low,
            BingoError::SourceNotFound { .. }
            | BingoError::MalformedEntry { .. }
            | BingoError::InsufficientEntries { .. }
            | BingoError::ConfigError { .. }
            | BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            BingoError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether the error stops the whole batch or only the current card.
    pub fn is_fatal(&self) -> bool {
        self.severity() > ErrorSeverity::Low
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            BingoError::SourceNotFound { .. } => EXIT_SOURCE_NOT_FOUND,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BingoError::SourceNotFound { .. } => {
                "Pass the path of an existing word list as the first argument"
            }
            BingoError::MalformedEntry { .. } => {
                "Every line must look like \"Song Title-Artist Name\""
            }
            BingoError::InsufficientEntries { .. } => {
                "Add more songs to the word list; a card needs 24 distinct entries"
            }
            BingoError::SaveFailure { .. } => {
                "Check that the output directory is writable and the file is not open elsewhere"
            }
            BingoError::RenderError { .. } | BingoError::FontError { .. } => {
                "Check the font configuration or fall back to the built-in fonts"
            }
            BingoError::TaskError(_) => "Re-run with --concurrent-cards 1 and --verbose",
            BingoError::IoError(_) => "Check file permissions and available disk space",
            BingoError::ConfigError { .. }
            | BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line arguments"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BingoError::SourceNotFound { path } => {
                format!("File {} doesn't exist. Stopping.", path)
            }
            BingoError::MalformedEntry { line, content } => {
                format!("Line {} of the word list is not valid: {:?}", line, content)
            }
            BingoError::InsufficientEntries {
                available,
                required,
            } => format!(
                "The word list has {} entries but a card needs {}",
                available, required
            ),
            BingoError::SaveFailure { path, .. } => format!("Cannot save to {}.", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BingoError>;
