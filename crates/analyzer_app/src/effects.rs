use std::time::Duration;

use analyzer_core::{AnalysisError, Effect, Msg};
use analyzer_engine::{EngineError, EngineEvent, EngineHandle};
use analyzer_logging::{analyzer_debug, analyzer_info, analyzer_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartProgress { attempt } => {
                    analyzer_debug!("StartProgress attempt={}", attempt);
                    self.engine.start_progress(attempt);
                }
                Effect::StopProgress { attempt } => {
                    analyzer_debug!("StopProgress attempt={}", attempt);
                    self.engine.stop_progress(attempt);
                }
                Effect::SubmitAnalysis { attempt, request } => {
                    analyzer_info!(
                        "SubmitAnalysis attempt={} file={} size={} jd_len={}",
                        attempt,
                        request.file.name,
                        request.file.size(),
                        request.job_description.len()
                    );
                    self.engine.submit(attempt, request);
                }
                Effect::DownloadReport { attempt, plan } => {
                    analyzer_info!(
                        "DownloadReport attempt={} report_id={} filename={}",
                        attempt,
                        plan.report_id,
                        plan.filename
                    );
                    self.engine.download(attempt, plan);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event; fails once the engine is gone.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }

    #[cfg(test)]
    pub fn stop_engine(&mut self) {
        self.engine.stop();
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProgressTick { attempt } => Msg::ProgressTick { attempt },
        EngineEvent::AnalysisCompleted { attempt, result } => {
            if let Err(err) = &result {
                analyzer_warn!("Attempt {} failed: {}", attempt, err);
            }
            Msg::AnalysisSettled {
                attempt,
                result: result.map_err(AnalysisError::from),
            }
        }
        EngineEvent::DownloadCompleted { attempt, result } => {
            Msg::DownloadSettled { attempt, result }
        }
    }
}
