#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked (or dropped) a resume file.
    FileSelected(crate::SelectedFile),
    /// User chose to pick a different file.
    FileCleared,
    /// User edited the job description text.
    JobDescriptionChanged(String),
    /// User clicked Analyze.
    AnalyzeClicked,
    /// Progress timer fired for an attempt.
    ProgressTick { attempt: crate::AttemptId },
    /// The upload for an attempt settled, successfully or not.
    AnalysisSettled {
        attempt: crate::AttemptId,
        result: Result<crate::RawAnalysisResponse, crate::AnalysisError>,
    },
    /// User asked for the generated report.
    DownloadClicked,
    /// Report download and local save finished.
    DownloadSettled {
        attempt: crate::AttemptId,
        result: Result<crate::ReportSaved, crate::DownloadError>,
    },
    /// User clicked "Analyze another resume".
    AnalyzeAnotherClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
