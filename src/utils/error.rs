use std::fmt;
use thiserror::Error;

/// 管線階段，用於標示錯誤發生的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Audit,
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "competitor discovery",
            Stage::Audit => "domain audits",
            Stage::Synthesis => "report synthesis",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("{operation} timed out after {seconds}s")]
    TimeoutError { operation: String, seconds: u64 },

    #[error("Web search failed: {message}")]
    SearchError { message: String },

    #[error("Text generation failed: {message}")]
    GenerationError { message: String },

    #[error("Competitor discovery failed: {message}")]
    DiscoveryError { message: String },

    #[error("Report synthesis failed: {message}")]
    SynthesisError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{stage} failed: {source}")]
    StageError {
        stage: Stage,
        #[source]
        source: Box<ScanError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScanError {
    pub fn search(message: impl Into<String>) -> Self {
        ScanError::SearchError {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        ScanError::GenerationError {
            message: message.into(),
        }
    }

    pub fn discovery(message: impl Into<String>) -> Self {
        ScanError::DiscoveryError {
            message: message.into(),
        }
    }

    pub fn synthesis(message: impl Into<String>) -> Self {
        ScanError::SynthesisError {
            message: message.into(),
        }
    }

    /// 包裝成帶有階段資訊的錯誤
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            already @ ScanError::StageError { .. } => already,
            other => ScanError::StageError {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// 錯誤發生的階段（若有）
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ScanError::StageError { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::HttpError(_)
            | ScanError::HttpStatusError { .. }
            | ScanError::TimeoutError { .. } => ErrorCategory::Network,
            ScanError::SearchError { .. }
            | ScanError::GenerationError { .. }
            | ScanError::SynthesisError { .. }
            | ScanError::DiscoveryError { .. } => ErrorCategory::Provider,
            ScanError::ConfigError { .. }
            | ScanError::MissingConfigError { .. }
            | ScanError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScanError::SerializationError(_) | ScanError::UrlError(_) => ErrorCategory::Data,
            ScanError::IoError(_) => ErrorCategory::System,
            ScanError::StageError { source, .. } => source.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScanError::DiscoveryError { .. } => ErrorSeverity::Low,
            ScanError::HttpError(_)
            | ScanError::HttpStatusError { .. }
            | ScanError::TimeoutError { .. }
            | ScanError::UrlError(_)
            | ScanError::SearchError { .. } => ErrorSeverity::Medium,
            ScanError::GenerationError { .. }
            | ScanError::SynthesisError { .. }
            | ScanError::SerializationError(_)
            | ScanError::ConfigError { .. }
            | ScanError::MissingConfigError { .. }
            | ScanError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ScanError::IoError(_) => ErrorSeverity::Critical,
            ScanError::StageError { source, .. } => source.severity(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and that the site is reachable, then retry",
            ErrorCategory::Provider => "Verify provider credentials, model names and quotas, then retry",
            ErrorCategory::Configuration => "Fix the configuration value named above (see --help or the TOML file)",
            ErrorCategory::Data => "The provider returned unexpected data; retry or switch models",
            ErrorCategory::System => "Check file permissions and free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScanError::StageError { stage, source } => {
                format!("The scan stopped during {}: {}", stage, source)
            }
            ScanError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
