use crate::view_model::{AppViewModel, ProgressView};
use crate::{
    normalize, normalize_details, plan_download, validate, AnalysisDetails, AnalysisRequest,
    AnalysisSummary, DownloadError, ErrorChannel, ErrorStage, ProgressSimulator,
    RawAnalysisResponse, ReportSaved, SchemaError, SelectedFile, TickOutcome, DEFAULT_USER_NAME,
};

pub type AttemptId = u64;

/// Why an analysis attempt settled without a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Transport failure or a non-success HTTP status.
    #[error("Failed to analyze resume: {0}")]
    Network(String),
    #[error("Failed to analyze resume: {0}")]
    Schema(#[from] SchemaError),
}

impl AnalysisError {
    pub fn stage(&self) -> ErrorStage {
        match self {
            AnalysisError::Network(_) => ErrorStage::Network,
            AnalysisError::Schema(_) => ErrorStage::Schema,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    #[default]
    Idle,
    InFlight,
    Saved(ReportSaved),
    Failed(DownloadError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    file: Option<SelectedFile>,
    job_description: String,
    user_name: String,
    last_attempt: AttemptId,
    in_flight: Option<AttemptId>,
    progress: ProgressSimulator,
    raw: Option<RawAnalysisResponse>,
    summary: Option<AnalysisSummary>,
    details: Option<AnalysisDetails>,
    errors: ErrorChannel,
    download: DownloadStatus,
    /// Attempt whose report is being downloaded.
    downloading: Option<AttemptId>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            file: None,
            job_description: String::new(),
            user_name: DEFAULT_USER_NAME.to_string(),
            last_attempt: 0,
            in_flight: None,
            progress: ProgressSimulator::default(),
            raw: None,
            summary: None,
            details: None,
            errors: ErrorChannel::default(),
            download: DownloadStatus::Idle,
            downloading: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name sent as `user_name`; comes from the identity provider when one exists.
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    pub fn view(&self) -> AppViewModel {
        let analyzing = self.in_flight.is_some();
        let progress = if analyzing {
            let state = self.progress.state();
            state.current().map(|step| ProgressView {
                step_index: state.step_index(),
                step_count: state.steps().len(),
                title: step.title,
                description: step.description,
            })
        } else {
            None
        };

        AppViewModel {
            file_name: self.file.as_ref().map(|file| file.name.clone()),
            file_size: self.file.as_ref().map(SelectedFile::size_label),
            job_description_chars: self.job_description.chars().count(),
            can_submit: !analyzing && validate(self.file.as_ref(), &self.job_description).is_ok(),
            analyzing,
            progress,
            error: self.errors.current().cloned(),
            scores: self
                .summary
                .as_ref()
                .map(AppViewModel::score_cards)
                .unwrap_or_default(),
            summary: self.summary.clone(),
            details: self.details.clone(),
            service_error: self
                .raw
                .as_ref()
                .and_then(RawAnalysisResponse::service_error_message),
            raw_json: self.raw.as_ref().map(RawAnalysisResponse::to_pretty_string),
            can_download: self.raw.is_some() && self.download != DownloadStatus::InFlight,
            download: self.download.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn in_flight(&self) -> Option<AttemptId> {
        self.in_flight
    }

    pub fn progress(&self) -> &ProgressSimulator {
        &self.progress
    }

    pub fn raw_response(&self) -> Option<&RawAnalysisResponse> {
        self.raw.as_ref()
    }

    pub fn summary(&self) -> Option<&AnalysisSummary> {
        self.summary.as_ref()
    }

    pub fn details(&self) -> Option<&AnalysisDetails> {
        self.details.as_ref()
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    pub fn download_status(&self) -> &DownloadStatus {
        &self.download
    }

    pub(crate) fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.dirty = true;
    }

    pub(crate) fn clear_file(&mut self) {
        if self.file.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn set_job_description(&mut self, text: String) {
        if self.job_description != text {
            self.job_description = text;
            self.dirty = true;
        }
    }

    /// Drops everything the previous attempt produced.
    pub(crate) fn clear_attempt_results(&mut self) {
        self.errors.clear();
        self.raw = None;
        self.summary = None;
        self.details = None;
        self.download = DownloadStatus::Idle;
        self.downloading = None;
        self.dirty = true;
    }

    pub(crate) fn report_error(&mut self, stage: ErrorStage, message: String) {
        self.errors.set(stage, message);
        self.dirty = true;
    }

    /// Allocates a new attempt and starts its progress run. Requires a selected file.
    pub(crate) fn start_attempt(&mut self) -> Option<(AttemptId, AnalysisRequest)> {
        let file = self.file.clone()?;
        self.last_attempt += 1;
        let attempt = self.last_attempt;
        self.in_flight = Some(attempt);
        self.progress.start(attempt);
        self.dirty = true;
        Some((
            attempt,
            AnalysisRequest {
                file,
                job_description: self.job_description.clone(),
                user_name: self.user_name.clone(),
            },
        ))
    }

    pub(crate) fn tick_progress(&mut self, attempt: AttemptId) -> TickOutcome {
        let outcome = self.progress.tick(attempt);
        if matches!(outcome, TickOutcome::Advanced { .. }) {
            self.dirty = true;
        }
        outcome
    }

    /// Applies the network result of `attempt`. Returns `false` for a stale attempt.
    pub(crate) fn settle_attempt(
        &mut self,
        attempt: AttemptId,
        result: Result<RawAnalysisResponse, AnalysisError>,
    ) -> bool {
        if self.in_flight != Some(attempt) {
            return false;
        }
        self.in_flight = None;
        self.progress.teardown();
        match result {
            Ok(raw) => {
                self.summary = Some(normalize(&raw));
                self.details = Some(normalize_details(&raw));
                self.raw = Some(raw);
            }
            Err(err) => self.errors.set(err.stage(), err.to_string()),
        }
        self.dirty = true;
        true
    }

    pub(crate) fn is_downloading(&self) -> bool {
        self.download == DownloadStatus::InFlight
    }

    pub(crate) fn plan_download(&self) -> Result<crate::DownloadPlan, DownloadError> {
        plan_download(self.raw.as_ref())
    }

    /// Marks the current response's report as in flight; the response belongs to the last attempt.
    pub(crate) fn begin_download(&mut self) -> AttemptId {
        self.download = DownloadStatus::InFlight;
        self.downloading = Some(self.last_attempt);
        self.dirty = true;
        self.last_attempt
    }

    /// Applies a download result for `attempt`. Returns `false` when no such download is running.
    pub(crate) fn settle_download(
        &mut self,
        attempt: AttemptId,
        result: Result<ReportSaved, DownloadError>,
    ) -> bool {
        if !self.is_downloading() || self.downloading != Some(attempt) {
            return false;
        }
        self.downloading = None;
        self.finish_download(result);
        true
    }

    pub(crate) fn fail_download(&mut self, err: DownloadError) {
        self.finish_download(Err(err));
    }

    fn finish_download(&mut self, result: Result<ReportSaved, DownloadError>) {
        self.download = match result {
            Ok(saved) => DownloadStatus::Saved(saved),
            Err(err) => DownloadStatus::Failed(err),
        };
        self.dirty = true;
    }

    /// Back to the initial form. Attempt numbering continues so late events stay stale.
    pub(crate) fn reset(&mut self) {
        let user_name = std::mem::take(&mut self.user_name);
        let last_attempt = self.last_attempt;
        *self = Self {
            user_name,
            last_attempt,
            dirty: true,
            ..Self::default()
        };
    }
}
