#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Validation,
    Network,
    Schema,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageError {
    pub stage: ErrorStage,
    pub message: String,
}

/// Single slot for the current attempt's error. A new error replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorChannel {
    slot: Option<StageError>,
}

impl ErrorChannel {
    pub fn set(&mut self, stage: ErrorStage, message: impl Into<String>) {
        self.slot = Some(StageError {
            stage,
            message: message.into(),
        });
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn current(&self) -> Option<&StageError> {
        self.slot.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.slot.as_ref().map(|err| err.message.as_str())
    }

    pub fn stage(&self) -> Option<ErrorStage> {
        self.slot.as_ref().map(|err| err.stage)
    }
}
