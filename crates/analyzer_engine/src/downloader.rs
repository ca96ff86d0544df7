use std::sync::Arc;

use analyzer_core::{plan_download, DownloadError, DownloadPlan, RawAnalysisResponse};
use analyzer_logging::{analyzer_error, analyzer_info, analyzer_warn};

use crate::{AnalysisService, DownloadArtifact};

/// Fetches the generated report for a previous analysis.
pub struct ReportDownloader {
    service: Arc<dyn AnalysisService>,
}

impl ReportDownloader {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self { service }
    }

    /// Checks the report id before any request is made.
    pub async fn download(
        &self,
        raw: Option<&RawAnalysisResponse>,
    ) -> Result<DownloadArtifact, DownloadError> {
        let plan = plan_download(raw).inspect_err(|err| {
            analyzer_warn!("Cannot download report: {}", err);
        })?;
        self.fetch(&plan).await
    }

    pub async fn fetch(&self, plan: &DownloadPlan) -> Result<DownloadArtifact, DownloadError> {
        let bytes = self
            .service
            .fetch_report(&plan.report_id)
            .await
            .map_err(|err| {
                analyzer_error!(
                    "Failed to download report {}: {} ({})",
                    plan.report_id,
                    err,
                    err.kind
                );
                DownloadError::Transport(err.message)
            })?;
        analyzer_info!(
            "Downloaded report {} as {} ({} bytes)",
            plan.report_id,
            plan.filename,
            bytes.len()
        );
        Ok(DownloadArtifact {
            bytes,
            filename: plan.filename.clone(),
        })
    }
}
