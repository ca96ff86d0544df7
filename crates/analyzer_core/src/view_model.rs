use crate::{AnalysisDetails, AnalysisSummary, DownloadStatus, StageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            ScoreBand::Excellent
        } else if score >= 75.0 {
            ScoreBand::Good
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "needs improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreView {
    pub label: &'static str,
    pub value: f64,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub step_index: usize,
    pub step_count: usize,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub file_name: Option<String>,
    pub file_size: Option<String>,
    pub job_description_chars: usize,
    pub can_submit: bool,
    pub analyzing: bool,
    pub progress: Option<ProgressView>,
    pub error: Option<StageError>,
    pub scores: Vec<ScoreView>,
    pub summary: Option<AnalysisSummary>,
    pub details: Option<AnalysisDetails>,
    /// Message of a response the service itself flagged as failed.
    pub service_error: Option<String>,
    pub raw_json: Option<String>,
    pub can_download: bool,
    pub download: DownloadStatus,
    pub dirty: bool,
}

impl AppViewModel {
    pub(crate) fn score_cards(summary: &AnalysisSummary) -> Vec<ScoreView> {
        [
            ("Overall Score", summary.overall_score),
            ("ATS Compatibility", summary.ats_compatibility),
            ("Content Quality", summary.content_quality),
            ("Format & Design", summary.format_design),
            ("Keyword Optimization", summary.keyword_optimization),
        ]
        .into_iter()
        .map(|(label, value)| ScoreView {
            label,
            value,
            band: ScoreBand::for_score(value),
        })
        .collect()
    }
}
