#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start (or restart) the progress timer for an attempt.
    StartProgress { attempt: crate::AttemptId },
    /// Cancel the progress timer of an attempt.
    StopProgress { attempt: crate::AttemptId },
    SubmitAnalysis {
        attempt: crate::AttemptId,
        request: crate::AnalysisRequest,
    },
    /// Fetch and save the report of `attempt`'s response.
    DownloadReport {
        attempt: crate::AttemptId,
        plan: crate::DownloadPlan,
    },
}
