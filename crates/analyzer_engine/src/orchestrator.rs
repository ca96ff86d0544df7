use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use analyzer_core::{AnalysisRequest, RawAnalysisResponse};
use analyzer_logging::{analyzer_info, analyzer_warn};

use crate::{AnalysisService, SubmitError};

/// Sends one analysis request at a time and validates the response shape.
///
/// A `submit` issued while another is outstanding fails with
/// [`SubmitError::Busy`] without touching the network. There are no retries.
pub struct UploadOrchestrator {
    service: Arc<dyn AnalysisService>,
    in_flight: AtomicBool,
}

impl UploadOrchestrator {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns the full JSON body unmodified once it is known to carry `data`.
    pub async fn submit(
        &self,
        request: &AnalysisRequest,
    ) -> Result<RawAnalysisResponse, SubmitError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            analyzer_warn!("Rejected overlapping analysis submission");
            return Err(SubmitError::Busy);
        };

        let body = self.service.upload_resume(request).await.map_err(|err| {
            analyzer_warn!("Analysis upload failed: {} ({})", err, err.kind);
            SubmitError::Network(err)
        })?;
        let raw = RawAnalysisResponse::from_slice(&body).map_err(|err| {
            analyzer_warn!("Analysis response rejected: {}", err);
            SubmitError::Schema(err)
        })?;

        analyzer_info!(
            "Analysis completed success={:?} report_id={:?}",
            raw.success(),
            raw.report_id()
        );
        Ok(raw)
    }
}

// Clears the flag on every exit path, including a dropped future.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
