//! Total mapping from the loosely typed service payload to canonical view data.
//!
//! Nothing here fails: a missing, null or mistyped field degrades to `0`, an
//! empty list or `None`.
use serde_json::Value;

use crate::RawAnalysisResponse;

/// Score cards and headline lists shown after a successful analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisSummary {
    pub overall_score: f64,
    pub ats_compatibility: f64,
    pub content_quality: f64,
    pub format_design: f64,
    pub keyword_optimization: f64,
    /// Content, then format/design, then key improvements.
    pub recommendations: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportIds {
    pub resume_file_id: Option<String>,
    pub resume_report_id: Option<String>,
    pub document_id: Option<String>,
}

/// Everything else the detail view renders from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisDetails {
    pub weaknesses: Vec<String>,
    pub content_improvements: Vec<String>,
    pub format_design_improvements: Vec<String>,
    pub key_improvements: Vec<String>,
    pub ai_job_category: Option<String>,
    pub ml_job_category: Option<String>,
    pub conclusion: Option<String>,
    pub resume_content: Option<String>,
    pub job_description: Option<String>,
    pub ids: ReportIds,
}

pub fn normalize(raw: &RawAnalysisResponse) -> AnalysisSummary {
    let mut recommendations = string_list(raw, "content_improvements");
    recommendations.extend(string_list(raw, "format_design_improvements"));
    recommendations.extend(string_list(raw, "key_improvements"));

    AnalysisSummary {
        overall_score: score(raw, "overall_score"),
        ats_compatibility: score(raw, "ats_score"),
        content_quality: score(raw, "content_score"),
        format_design: score(raw, "format_design_score"),
        keyword_optimization: score(raw, "keyword_score"),
        recommendations,
        strengths: string_list(raw, "strengths"),
    }
}

pub fn normalize_details(raw: &RawAnalysisResponse) -> AnalysisDetails {
    AnalysisDetails {
        weaknesses: string_list(raw, "weakness"),
        content_improvements: string_list(raw, "content_improvements"),
        format_design_improvements: string_list(raw, "format_design_improvements"),
        key_improvements: string_list(raw, "key_improvements"),
        ai_job_category: text(raw, "ai_job_category"),
        ml_job_category: text(raw, "ml_job_category"),
        conclusion: text(raw, "conclusion"),
        resume_content: text(raw, "resume_content"),
        job_description: text(raw, "job_description"),
        ids: ReportIds {
            resume_file_id: raw.resume_file_id(),
            resume_report_id: raw.report_id(),
            document_id: raw.document_id(),
        },
    }
}

fn score(raw: &RawAnalysisResponse, key: &str) -> f64 {
    raw.data_field(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn string_list(raw: &RawAnalysisResponse, key: &str) -> Vec<String> {
    match raw.data_field(key) {
        Some(Value::Array(items)) => items.iter().map(entry_text).collect(),
        _ => Vec::new(),
    }
}

// Lists keep their length; odd entries become text.
fn entry_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn text(raw: &RawAnalysisResponse, key: &str) -> Option<String> {
    raw.data_field(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(ToOwned::to_owned)
}
