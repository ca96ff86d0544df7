use std::sync::Once;

use analyzer_core::{
    update, AnalysisError, AnalysisRequest, AppState, AttemptId, DownloadError, DownloadPlan,
    DownloadStatus, Effect, ErrorStage, Msg, RawAnalysisResponse, ReportSaved, SchemaError,
    SelectedFile,
};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(analyzer_logging::initialize_for_tests);
}

fn fill_form(state: AppState, file_name: &str, job_description: &str) -> AppState {
    let (state, _) = update(
        state,
        Msg::FileSelected(SelectedFile::new(file_name, b"%PDF-1.4".to_vec())),
    );
    let (state, _) = update(state, Msg::JobDescriptionChanged(job_description.to_string()));
    state
}

fn analyze(state: AppState) -> (AppState, AttemptId, Vec<Effect>) {
    let (state, effects) = update(state, Msg::AnalyzeClicked);
    let attempt = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitAnalysis { attempt, .. } => Some(*attempt),
            _ => None,
        })
        .expect("submit effect");
    (state, attempt, effects)
}

fn settle_ok(state: AppState, attempt: AttemptId, body: serde_json::Value) -> AppState {
    let raw = RawAnalysisResponse::from_json(body).expect("schema-valid");
    let (state, _) = update(
        state,
        Msg::AnalysisSettled {
            attempt,
            result: Ok(raw),
        },
    );
    state
}

fn successful_body() -> serde_json::Value {
    json!({
        "success": true,
        "resume_file_id": "f-1",
        "resume_report_id": "r-1",
        "_id": "d-1",
        "resume_file_name": "cv.pdf",
        "data": {
            "overall_score": 85,
            "ats_score": 88,
            "strengths": ["Clean formatting"],
            "content_improvements": ["Add metrics"]
        }
    })
}

#[test]
fn analyze_without_input_reports_validation_error() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::AnalyzeClicked);

    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), None);
    assert_eq!(state.errors().stage(), Some(ErrorStage::Validation));
    assert_eq!(
        state.errors().message(),
        Some("Please upload a resume and paste a job description.")
    );
    assert!(!state.progress().is_active());
    assert!(state.consume_dirty());
}

#[test]
fn blank_job_description_blocks_submission() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "   \n ");
    assert!(!state.view().can_submit);

    let (state, effects) = update(state, Msg::AnalyzeClicked);
    assert!(effects.is_empty());
    assert_eq!(state.errors().stage(), Some(ErrorStage::Validation));
}

#[test]
fn analyze_starts_progress_and_submits_request() {
    init_logging();
    let state = fill_form(
        AppState::new().with_user_name("jane"),
        "cv.pdf",
        "Backend Engineer with Go experience",
    );
    assert!(state.view().can_submit);

    let (state, attempt, effects) = analyze(state);

    assert_eq!(
        effects,
        vec![
            Effect::StartProgress { attempt },
            Effect::SubmitAnalysis {
                attempt,
                request: AnalysisRequest {
                    file: SelectedFile::new("cv.pdf", b"%PDF-1.4".to_vec()),
                    job_description: "Backend Engineer with Go experience".to_string(),
                    user_name: "jane".to_string(),
                },
            },
        ]
    );
    let view = state.view();
    assert!(view.analyzing);
    assert!(!view.can_submit);
    let progress = view.progress.expect("progress shown");
    assert_eq!(progress.step_index, 0);
    assert_eq!(progress.step_count, 4);
    assert_eq!(progress.title, "Uploading Resume");
}

#[test]
fn second_click_while_in_flight_is_rejected() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);

    let before = state.clone();
    let (state, effects) = update(state, Msg::AnalyzeClicked);

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.in_flight(), Some(attempt));
}

#[test]
fn successful_response_publishes_summary_and_stops_progress() {
    init_logging();
    let state = fill_form(
        AppState::new(),
        "cv.pdf",
        "Backend Engineer with Go experience",
    );
    let (state, attempt, _) = analyze(state);
    let raw = RawAnalysisResponse::from_json(successful_body()).unwrap();

    let (state, effects) = update(
        state,
        Msg::AnalysisSettled {
            attempt,
            result: Ok(raw.clone()),
        },
    );

    assert_eq!(effects, vec![Effect::StopProgress { attempt }]);
    assert!(!state.progress().is_active());
    assert_eq!(state.in_flight(), None);
    assert_eq!(state.raw_response(), Some(&raw));

    let summary = state.summary().expect("summary");
    assert_eq!(summary.overall_score, 85.0);
    assert_eq!(summary.ats_compatibility, 88.0);
    assert_eq!(summary.content_quality, 0.0);
    assert_eq!(summary.format_design, 0.0);
    assert_eq!(summary.keyword_optimization, 0.0);
    assert_eq!(summary.strengths, vec!["Clean formatting"]);
    assert_eq!(summary.recommendations, vec!["Add metrics"]);
    assert_eq!(state.errors().current(), None);

    let view = state.view();
    assert!(view.progress.is_none());
    assert_eq!(view.scores.len(), 5);
    assert_eq!(view.scores[0].label, "Overall Score");
    assert!(view.can_download);
    assert!(view.raw_json.unwrap().contains("\"resume_report_id\": \"r-1\""));
}

#[test]
fn http_failure_sets_network_error_without_summary() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let (state, _) = update(state, Msg::ProgressTick { attempt });

    let (state, effects) = update(
        state,
        Msg::AnalysisSettled {
            attempt,
            result: Err(AnalysisError::Network(
                "Server responded with 500".to_string(),
            )),
        },
    );

    assert_eq!(effects, vec![Effect::StopProgress { attempt }]);
    assert_eq!(state.errors().stage(), Some(ErrorStage::Network));
    assert_eq!(
        state.errors().message(),
        Some("Failed to analyze resume: Server responded with 500")
    );
    assert_eq!(state.summary(), None);
    assert_eq!(state.raw_response(), None);
    assert!(!state.progress().is_active());
    assert!(!state.view().analyzing);
}

#[test]
fn missing_data_sets_schema_error() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let err = RawAnalysisResponse::from_json(json!({ "success": true })).unwrap_err();

    let (state, _) = update(
        state,
        Msg::AnalysisSettled {
            attempt,
            result: Err(AnalysisError::Schema(err)),
        },
    );

    assert_eq!(state.errors().stage(), Some(ErrorStage::Schema));
    assert_eq!(
        state.errors().message(),
        Some("Failed to analyze resume: Invalid API response: 'data' object not found.")
    );
    assert_eq!(state.summary(), None);
}

#[test]
fn second_attempt_clears_previous_results_first() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, first, _) = analyze(state);
    let state = settle_ok(state, first, successful_body());
    assert!(state.summary().is_some());

    let (state, second, _) = analyze(state);

    assert!(second > first);
    assert_eq!(state.raw_response(), None);
    assert_eq!(state.summary(), None);
    assert_eq!(state.details(), None);
    assert_eq!(state.errors().current(), None);
    assert_eq!(state.progress().state().step_index(), 0);
}

#[test]
fn new_attempt_clears_previous_error() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, first, _) = analyze(state);
    let (state, _) = update(
        state,
        Msg::AnalysisSettled {
            attempt: first,
            result: Err(AnalysisError::Network("connection refused".to_string())),
        },
    );
    assert!(state.errors().current().is_some());

    let (state, _, _) = analyze(state);
    assert_eq!(state.errors().current(), None);
}

#[test]
fn progress_ticks_stop_at_last_step() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (mut state, attempt, _) = analyze(state);

    let mut stop_effects = Vec::new();
    for _ in 0..6 {
        let (next, effects) = update(state, Msg::ProgressTick { attempt });
        stop_effects.extend(effects);
        state = next;
    }

    assert_eq!(stop_effects, vec![Effect::StopProgress { attempt }]);
    let progress = state.view().progress.expect("still analyzing");
    assert_eq!(progress.step_index, 3);
    assert_eq!(progress.title, "Generating Report");
}

#[test]
fn stale_events_from_previous_attempt_are_ignored() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, first, _) = analyze(state);
    let state = settle_ok(state, first, successful_body());
    let (state, second, _) = analyze(state);

    let (state, effects) = update(state, Msg::ProgressTick { attempt: first });
    assert!(effects.is_empty());
    assert_eq!(state.progress().state().step_index(), 0);

    let before = state.clone();
    let raw = RawAnalysisResponse::from_json(successful_body()).unwrap();
    let (state, effects) = update(
        state,
        Msg::AnalysisSettled {
            attempt: first,
            result: Ok(raw),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.in_flight(), Some(second));
}

#[test]
fn download_without_report_id_issues_no_effect() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let state = settle_ok(state, attempt, json!({ "success": true, "data": {} }));

    let (state, effects) = update(state, Msg::DownloadClicked);

    assert!(effects.is_empty());
    assert_eq!(
        state.download_status(),
        &DownloadStatus::Failed(DownloadError::MissingReportId)
    );
    // The analysis error slot is untouched and the summary stays visible.
    assert_eq!(state.errors().current(), None);
    assert!(state.summary().is_some());
}

#[test]
fn download_after_service_failure_explains_no_report() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let state = settle_ok(
        state,
        attempt,
        json!({
            "success": false,
            "error": { "type": "InputValidationError", "message": "Resume text is empty" },
            "data": {}
        }),
    );
    assert_eq!(
        state.view().service_error.as_deref(),
        Some("Resume text is empty")
    );

    let (state, effects) = update(state, Msg::DownloadClicked);

    assert!(effects.is_empty());
    assert_eq!(
        state.download_status(),
        &DownloadStatus::Failed(DownloadError::NoReportGenerated)
    );
}

#[test]
fn download_round_trip_keeps_summary() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let state = settle_ok(state, attempt, successful_body());

    let (state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::DownloadReport {
            attempt,
            plan: DownloadPlan {
                report_id: "r-1".to_string(),
                filename: "cv_report.pdf".to_string(),
            },
        }]
    );
    assert_eq!(state.download_status(), &DownloadStatus::InFlight);
    assert!(!state.view().can_download);

    // A second click while the first download runs does nothing.
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert!(effects.is_empty());

    let saved = ReportSaved {
        filename: "cv_report.pdf".to_string(),
        location: "out/cv_report.pdf".to_string(),
    };
    let (state, _) = update(
        state,
        Msg::DownloadSettled {
            attempt,
            result: Ok(saved.clone()),
        },
    );
    assert_eq!(state.download_status(), &DownloadStatus::Saved(saved));
    assert!(state.summary().is_some());
}

#[test]
fn download_failure_does_not_touch_analysis_error_channel() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let state = settle_ok(state, attempt, successful_body());
    let (state, _) = update(state, Msg::DownloadClicked);

    let (state, _) = update(
        state,
        Msg::DownloadSettled {
            attempt,
            result: Err(DownloadError::Transport(
                "Server responded with 404".to_string(),
            )),
        },
    );

    assert!(matches!(
        state.download_status(),
        DownloadStatus::Failed(DownloadError::Transport(_))
    ));
    assert_eq!(state.errors().current(), None);
    assert!(state.summary().is_some());
}

#[test]
fn analyze_another_resets_to_initial_view() {
    init_logging();
    let state = fill_form(AppState::new().with_user_name("jane"), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let state = settle_ok(state, attempt, successful_body());

    let (state, effects) = update(state, Msg::AnalyzeAnotherClicked);

    assert!(effects.is_empty());
    let mut view = state.view();
    assert!(view.dirty);
    view.dirty = false;
    assert_eq!(view, AppState::new().view());
    assert_eq!(state.user_name(), "jane");

    // Attempt numbering continues after a reset.
    let state = fill_form(state, "cv.pdf", "Backend");
    let (_state, next, _) = analyze(state);
    assert!(next > attempt);
}

#[test]
fn download_from_previous_attempt_is_ignored() {
    init_logging();
    let state = fill_form(AppState::new(), "old.pdf", "Backend");
    let (state, first, _) = analyze(state);
    let state = settle_ok(state, first, successful_body());
    let (state, _) = update(state, Msg::DownloadClicked);

    let (state, _) = update(state, Msg::AnalyzeAnotherClicked);
    assert_eq!(state.download_status(), &DownloadStatus::Idle);

    let state = fill_form(state, "new.pdf", "Frontend");
    let (state, second, _) = analyze(state);
    let state = settle_ok(state, second, successful_body());
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert!(matches!(
        effects.as_slice(),
        [Effect::DownloadReport { attempt, .. }] if *attempt == second
    ));

    let (state, _) = update(
        state,
        Msg::DownloadSettled {
            attempt: first,
            result: Ok(ReportSaved {
                filename: "old_report.pdf".to_string(),
                location: "out/old_report.pdf".to_string(),
            }),
        },
    );
    assert_eq!(state.download_status(), &DownloadStatus::InFlight);

    let saved = ReportSaved {
        filename: "new_report.pdf".to_string(),
        location: "out/new_report.pdf".to_string(),
    };
    let (state, _) = update(
        state,
        Msg::DownloadSettled {
            attempt: second,
            result: Ok(saved.clone()),
        },
    );
    assert_eq!(state.download_status(), &DownloadStatus::Saved(saved));
}

#[test]
fn download_settlement_without_running_download_is_ignored() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);
    let state = settle_ok(state, attempt, successful_body());

    let (state, _) = update(
        state,
        Msg::DownloadSettled {
            attempt,
            result: Err(DownloadError::Transport("late".to_string())),
        },
    );
    assert_eq!(state.download_status(), &DownloadStatus::Idle);
}

#[test]
fn analyze_another_is_ignored_while_in_flight() {
    init_logging();
    let state = fill_form(AppState::new(), "cv.pdf", "Backend");
    let (state, attempt, _) = analyze(state);

    let (state, _) = update(state, Msg::AnalyzeAnotherClicked);

    assert_eq!(state.in_flight(), Some(attempt));
    assert!(state.file().is_some());
}

#[test]
fn schema_error_from_service_failure_mentions_service_message() {
    init_logging();
    let err = SchemaError::MissingData {
        service_message: Some("Something went wrong".to_string()),
    };
    assert_eq!(
        AnalysisError::from(err).to_string(),
        "Failed to analyze resume: Invalid API response: 'data' object not found. Service reported: Something went wrong"
    );
}
