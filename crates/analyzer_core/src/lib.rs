//! Analyzer core: pure state machine, response normalization and view-model helpers.
mod download;
mod effect;
mod error_channel;
mod msg;
mod normalize;
mod progress;
mod request;
mod response;
mod state;
mod update;
mod validate;
mod view_model;

pub use download::{plan_download, report_filename, DownloadError, DownloadPlan, ReportSaved};
pub use effect::Effect;
pub use error_channel::{ErrorChannel, ErrorStage, StageError};
pub use msg::Msg;
pub use normalize::{normalize, normalize_details, AnalysisDetails, AnalysisSummary, ReportIds};
pub use progress::{ProgressSimulator, ProgressState, Step, TickOutcome, ANALYSIS_STEPS};
pub use request::{mime_for_filename, AnalysisRequest, SelectedFile, DEFAULT_USER_NAME};
pub use response::{RawAnalysisResponse, SchemaError};
pub use state::{AnalysisError, AppState, AttemptId, DownloadStatus};
pub use update::update;
pub use validate::{validate, ValidationError};
pub use view_model::{AppViewModel, ProgressView, ScoreBand, ScoreView};
