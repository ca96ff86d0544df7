use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use analyzer_core::{AnalysisRequest, AttemptId, DownloadError, DownloadPlan, ReportSaved};
use analyzer_logging::{analyzer_debug, analyzer_error, analyzer_info};

use crate::{
    save_artifact, AnalysisService, ChannelEventSink, EngineError, EngineEvent, EventSink,
    ProgressTicker, ReportDownloader, ReqwestAnalysisService, ServiceSettings, UploadOrchestrator,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub progress_interval: Duration,
    /// Where downloaded reports are saved.
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            service: ServiceSettings::default(),
            progress_interval: Duration::from_millis(1500),
            output_dir,
        }
    }
}

enum EngineCommand {
    Submit {
        attempt: AttemptId,
        request: AnalysisRequest,
    },
    StartProgress {
        attempt: AttemptId,
    },
    StopProgress {
        attempt: AttemptId,
    },
    Download {
        attempt: AttemptId,
        plan: DownloadPlan,
    },
    Shutdown,
}

/// Session-scoped engine: owns the service handle and a tokio runtime on its own thread.
///
/// Created explicitly by the host and shut down when dropped.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let service = Arc::new(ReqwestAnalysisService::new(config.service.clone())?);
        Self::with_service(service, config)
    }

    pub fn with_service(
        service: Arc<dyn AnalysisService>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        let worker = thread::Builder::new()
            .name("analyzer-engine".to_string())
            .spawn(move || {
                let orchestrator = Arc::new(UploadOrchestrator::new(service.clone()));
                let downloader = Arc::new(ReportDownloader::new(service));
                let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
                let mut ticker = ProgressTicker::new(runtime.handle().clone());

                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Submit { attempt, request } => {
                            let orchestrator = orchestrator.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let result = orchestrator.submit(&request).await;
                                sink.emit(EngineEvent::AnalysisCompleted { attempt, result });
                            });
                        }
                        EngineCommand::StartProgress { attempt } => {
                            ticker.start(attempt, config.progress_interval, sink.clone());
                        }
                        EngineCommand::StopProgress { attempt } => ticker.stop(attempt),
                        EngineCommand::Download { attempt, plan } => {
                            let downloader = downloader.clone();
                            let sink = sink.clone();
                            let output_dir = config.output_dir.clone();
                            runtime.spawn(async move {
                                let result = download_and_save(&downloader, &plan, output_dir).await;
                                sink.emit(EngineEvent::DownloadCompleted { attempt, result });
                            });
                        }
                        EngineCommand::Shutdown => break,
                    }
                }

                ticker.stop_all();
                analyzer_debug!("engine thread shutting down");
            })?;

        analyzer_info!("engine started");
        Ok(Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn submit(&self, attempt: AttemptId, request: AnalysisRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { attempt, request });
    }

    pub fn start_progress(&self, attempt: AttemptId) {
        let _ = self.cmd_tx.send(EngineCommand::StartProgress { attempt });
    }

    pub fn stop_progress(&self, attempt: AttemptId) {
        let _ = self.cmd_tx.send(EngineCommand::StopProgress { attempt });
    }

    pub fn download(&self, attempt: AttemptId, plan: DownloadPlan) {
        let _ = self.cmd_tx.send(EngineCommand::Download { attempt, plan });
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing arrived yet.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Stopped),
        }
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Stops the engine thread; in-flight requests are dropped with the runtime.
    /// Later commands are ignored and `recv_timeout` reports `Stopped`.
    pub fn stop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                analyzer_error!("engine thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn download_and_save(
    downloader: &ReportDownloader,
    plan: &DownloadPlan,
    output_dir: PathBuf,
) -> Result<ReportSaved, DownloadError> {
    let artifact = downloader.fetch(plan).await?;
    let path = save_artifact(&output_dir, &artifact).map_err(|err| {
        analyzer_error!("Failed to save report to {:?}: {}", output_dir, err);
        DownloadError::Save(err.to_string())
    })?;
    analyzer_info!("Saved report to {:?}", path);
    Ok(ReportSaved {
        filename: artifact.filename,
        location: path.display().to_string(),
    })
}
