use crate::AttemptId;

/// One display stage of the cosmetic progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub title: &'static str,
    pub description: &'static str,
}

pub const ANALYSIS_STEPS: &[Step] = &[
    Step {
        title: "Uploading Resume",
        description: "Securely uploading your resume file...",
    },
    Step {
        title: "Parsing Content",
        description: "Extracting text and analyzing structure...",
    },
    Step {
        title: "AI Analysis",
        description: "Running AI algorithms for comprehensive analysis...",
    },
    Step {
        title: "Generating Report",
        description: "Creating detailed insights and recommendations...",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    step_index: usize,
    steps: &'static [Step],
}

impl ProgressState {
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn steps(&self) -> &'static [Step] {
        self.steps
    }

    pub fn current(&self) -> Option<&'static Step> {
        self.steps.get(self.step_index)
    }

    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick was not addressed to the running attempt, or the timer already stopped.
    Ignored,
    Advanced { step_index: usize },
    /// Already on the last step; the timer must be stopped.
    Finished,
}

/// Timer-driven display stages, deliberately independent of real network progress.
///
/// The simulator never measures time itself: each tick is delivered from
/// outside, so any clock (a tokio interval, a test loop) can drive it. The
/// step index only moves forward within one attempt and never passes the
/// last step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSimulator {
    state: ProgressState,
    attempt: Option<AttemptId>,
    ticking: bool,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::with_steps(ANALYSIS_STEPS)
    }
}

impl ProgressSimulator {
    pub fn with_steps(steps: &'static [Step]) -> Self {
        Self {
            state: ProgressState {
                step_index: 0,
                steps,
            },
            attempt: None,
            ticking: false,
        }
    }

    /// Tears down any previous run, then restarts at the first step for `attempt`.
    pub fn start(&mut self, attempt: AttemptId) {
        self.teardown();
        self.state.step_index = 0;
        self.attempt = Some(attempt);
        self.ticking = true;
    }

    pub fn tick(&mut self, attempt: AttemptId) -> TickOutcome {
        if !self.ticking || self.attempt != Some(attempt) {
            return TickOutcome::Ignored;
        }
        if self.state.step_index < self.state.last_index() {
            self.state.step_index += 1;
            TickOutcome::Advanced {
                step_index: self.state.step_index,
            }
        } else {
            self.ticking = false;
            TickOutcome::Finished
        }
    }

    /// Stops the run regardless of the step reached. The display index is kept.
    pub fn teardown(&mut self) {
        self.attempt = None;
        self.ticking = false;
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn attempt(&self) -> Option<AttemptId> {
        self.attempt
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_active(&self) -> bool {
        self.attempt.is_some()
    }
}
