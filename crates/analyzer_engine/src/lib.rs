//! Analyzer engine: HTTP service access, upload orchestration and effect execution.
mod downloader;
mod engine;
mod orchestrator;
mod persist;
mod service;
mod ticker;
mod types;

pub use downloader::ReportDownloader;
pub use engine::{EngineConfig, EngineHandle};
pub use orchestrator::UploadOrchestrator;
pub use persist::{ensure_output_dir, save_artifact, AtomicFileWriter, PersistError};
pub use service::{AnalysisService, ReqwestAnalysisService, ServiceSettings, DEFAULT_BASE_URL};
pub use ticker::{ChannelEventSink, EventSink, ProgressTicker};
pub use types::{
    DownloadArtifact, EngineError, EngineEvent, FailureKind, ServiceError, SubmitError,
};
