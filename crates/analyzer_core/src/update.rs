use crate::{validate, AppState, Effect, ErrorStage, Msg, TickOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => {
            state.select_file(file);
            Vec::new()
        }
        Msg::FileCleared => {
            state.clear_file();
            Vec::new()
        }
        Msg::JobDescriptionChanged(text) => {
            state.set_job_description(text);
            Vec::new()
        }
        Msg::AnalyzeClicked => {
            // One attempt at a time, whatever the UI shows.
            if state.in_flight().is_some() {
                return (state, Vec::new());
            }
            state.clear_attempt_results();
            if let Err(err) = validate(state.file(), state.job_description()) {
                state.report_error(ErrorStage::Validation, err.to_string());
                return (state, Vec::new());
            }
            match state.start_attempt() {
                Some((attempt, request)) => vec![
                    Effect::StartProgress { attempt },
                    Effect::SubmitAnalysis { attempt, request },
                ],
                None => Vec::new(),
            }
        }
        Msg::ProgressTick { attempt } => match state.tick_progress(attempt) {
            TickOutcome::Finished => vec![Effect::StopProgress { attempt }],
            TickOutcome::Advanced { .. } | TickOutcome::Ignored => Vec::new(),
        },
        Msg::AnalysisSettled { attempt, result } => {
            if state.settle_attempt(attempt, result) {
                vec![Effect::StopProgress { attempt }]
            } else {
                Vec::new()
            }
        }
        Msg::DownloadClicked => {
            if state.is_downloading() {
                return (state, Vec::new());
            }
            match state.plan_download() {
                Ok(plan) => {
                    let attempt = state.begin_download();
                    vec![Effect::DownloadReport { attempt, plan }]
                }
                Err(err) => {
                    state.fail_download(err);
                    Vec::new()
                }
            }
        }
        Msg::DownloadSettled { attempt, result } => {
            state.settle_download(attempt, result);
            Vec::new()
        }
        Msg::AnalyzeAnotherClicked => {
            if state.in_flight().is_none() {
                state.reset();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
