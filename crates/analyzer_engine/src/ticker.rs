use std::sync::{mpsc, Arc};
use std::time::Duration;

use analyzer_core::AttemptId;
use analyzer_logging::analyzer_debug;
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Wall-clock source for the cosmetic progress steps.
///
/// At most one ticker runs at a time; `start` cancels the previous one.
/// The first tick fires one full period after start.
pub struct ProgressTicker {
    runtime: Handle,
    running: Option<(AttemptId, CancellationToken)>,
}

impl ProgressTicker {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            running: None,
        }
    }

    pub fn start(&mut self, attempt: AttemptId, period: Duration, sink: Arc<dyn EventSink>) {
        self.stop_all();
        let token = CancellationToken::new();
        let cancelled = token.clone();
        self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => sink.emit(EngineEvent::ProgressTick { attempt }),
                }
            }
            analyzer_debug!("progress ticker for attempt {} stopped", attempt);
        });
        self.running = Some((attempt, token));
    }

    /// Stops the ticker if it belongs to `attempt`.
    pub fn stop(&mut self, attempt: AttemptId) {
        if matches!(&self.running, Some((running, _)) if *running == attempt) {
            self.stop_all();
        }
    }

    pub fn stop_all(&mut self) {
        if let Some((_, token)) = self.running.take() {
            token.cancel();
        }
    }

    pub fn running_attempt(&self) -> Option<AttemptId> {
        self.running.as_ref().map(|(attempt, _)| *attempt)
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop_all();
    }
}
