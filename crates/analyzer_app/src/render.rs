use analyzer_core::{AnalysisDetails, AppViewModel, DownloadStatus, ProgressView, ScoreView};

/// Lines to print for whatever changed between `shown` and `view`.
pub fn render(shown: &AppViewModel, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.file_name != shown.file_name {
        if let (Some(name), Some(size)) = (&view.file_name, &view.file_size) {
            lines.push(format!("Selected {name} ({size})"));
        }
    }

    if view.analyzing && !shown.analyzing {
        lines.push("Analyzing your resume...".to_string());
    }
    if view.progress != shown.progress {
        if let Some(progress) = &view.progress {
            lines.push(progress_line(progress));
        }
    }

    if view.error != shown.error {
        if let Some(error) = &view.error {
            lines.push(format!("Error: {}", error.message));
        }
    }

    if view.summary != shown.summary && view.summary.is_some() {
        lines.extend(result_lines(view));
    }

    if view.download != shown.download {
        match &view.download {
            DownloadStatus::Idle => {}
            DownloadStatus::InFlight => lines.push("Downloading report...".to_string()),
            DownloadStatus::Saved(saved) => {
                lines.push(format!("Report saved to {}", saved.location));
            }
            DownloadStatus::Failed(err) => lines.push(format!("Error: {err}")),
        }
    }

    lines
}

fn progress_line(progress: &ProgressView) -> String {
    format!(
        "[{}/{}] {}: {}",
        progress.step_index + 1,
        progress.step_count,
        progress.title,
        progress.description
    )
}

fn result_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![String::new(), "Resume Analysis Results".to_string()];
    if let Some(message) = &view.service_error {
        lines.push(format!("Note: the service reported a problem: {message}"));
    }

    lines.extend(view.scores.iter().map(score_line));

    if let Some(summary) = &view.summary {
        push_list(&mut lines, "Strengths", &summary.strengths);
        push_list(&mut lines, "Recommendations", &summary.recommendations);
    }
    if let Some(details) = &view.details {
        lines.extend(detail_lines(details));
    }
    lines
}

fn score_line(score: &ScoreView) -> String {
    format!(
        "  {:<22}{:>5}  ({})",
        format!("{}:", score.label),
        format_score(score.value),
        score.band.label()
    )
}

fn detail_lines(details: &AnalysisDetails) -> Vec<String> {
    let mut lines = Vec::new();
    push_list(&mut lines, "Weaknesses", &details.weaknesses);

    let categories: Vec<String> = [
        ("AI job category", &details.ai_job_category),
        ("ML job category", &details.ml_job_category),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|value| format!("{label}: {value}")))
    .collect();
    if !categories.is_empty() {
        lines.push(String::new());
        lines.extend(categories);
    }

    if let Some(conclusion) = &details.conclusion {
        lines.push(String::new());
        lines.push("Conclusion".to_string());
        lines.push(format!("  {conclusion}"));
    }
    lines
}

fn push_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

/// Whole scores print without a fraction.
fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
