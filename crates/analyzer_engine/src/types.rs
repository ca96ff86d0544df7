use std::fmt;

use analyzer_core::{
    AnalysisError, AttemptId, DownloadError, RawAnalysisResponse, ReportSaved, SchemaError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ProgressTick {
        attempt: AttemptId,
    },
    AnalysisCompleted {
        attempt: AttemptId,
        result: Result<RawAnalysisResponse, SubmitError>,
    },
    DownloadCompleted {
        attempt: AttemptId,
        result: Result<ReportSaved, DownloadError>,
    },
}

/// A fetched report, ready to be saved under `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Transport-level failure talking to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn http_status(code: u16) -> Self {
        Self::new(
            FailureKind::HttpStatus(code),
            format!("Server responded with {code}"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why `UploadOrchestrator::submit` produced no response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Network(#[from] ServiceError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("An analysis is already in progress.")]
    Busy,
}

impl From<SubmitError> for AnalysisError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Network(err) => AnalysisError::Network(err.message),
            SubmitError::Schema(err) => AnalysisError::Schema(err),
            SubmitError::Busy => AnalysisError::Network(SubmitError::Busy.to_string()),
        }
    }
}

/// The engine could not be brought up.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("analysis engine has stopped")]
    Stopped,
}
