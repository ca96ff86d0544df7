use crate::RawAnalysisResponse;

const FALLBACK_RESUME_NAME: &str = "resume.pdf";
const REPORT_SUFFIX: &str = "_report";
const REPORT_EXTENSION: &str = "pdf";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("No analysis available to download a report for.")]
    NoAnalysis,
    #[error("Cannot download report: The resume analysis failed so no report was generated.")]
    NoReportGenerated,
    #[error("No report ID found to download.")]
    MissingReportId,
    #[error("Failed to download report: {0}")]
    Transport(String),
    #[error("Failed to save report: {0}")]
    Save(String),
}

/// What to fetch and under which name to offer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub report_id: String,
    pub filename: String,
}

/// Result of a completed download and local save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSaved {
    pub filename: String,
    pub location: String,
}

/// Checks download preconditions without touching the network.
pub fn plan_download(raw: Option<&RawAnalysisResponse>) -> Result<DownloadPlan, DownloadError> {
    let raw = raw.ok_or(DownloadError::NoAnalysis)?;
    match raw.report_id() {
        Some(report_id) => Ok(DownloadPlan {
            report_id,
            filename: report_filename(raw.resume_file_name()),
        }),
        None if raw.success() == Some(false) => Err(DownloadError::NoReportGenerated),
        None => Err(DownloadError::MissingReportId),
    }
}

/// `resume.pdf` -> `resume_report.pdf`; only the last extension is dropped.
///
/// The name comes from the service, so any directory part is discarded.
pub fn report_filename(original: Option<&str>) -> String {
    let original = original
        .and_then(|name| name.rsplit(|c: char| c == '/' || c == '\\').next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_RESUME_NAME);
    let stem = match original.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => original,
    };
    let stem = if stem.is_empty() { "resume" } else { stem };
    format!("{stem}{REPORT_SUFFIX}.{REPORT_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filename_replaces_extension() {
        assert_eq!(report_filename(Some("resume.pdf")), "resume_report.pdf");
        assert_eq!(report_filename(Some("cv.docx")), "cv_report.pdf");
        assert_eq!(report_filename(Some("my.cv.pdf")), "my.cv_report.pdf");
        assert_eq!(report_filename(Some("resume")), "resume_report.pdf");
        assert_eq!(report_filename(Some(".pdf")), "resume_report.pdf");
        assert_eq!(report_filename(None), "resume_report.pdf");
        assert_eq!(report_filename(Some("  ")), "resume_report.pdf");
    }

    #[test]
    fn filename_never_carries_a_directory() {
        assert_eq!(report_filename(Some("../escaped.pdf")), "escaped_report.pdf");
        assert_eq!(report_filename(Some("/tmp/abs_cv.pdf")), "abs_cv_report.pdf");
        assert_eq!(report_filename(Some("C:\\Users\\me\\cv.docx")), "cv_report.pdf");
        assert_eq!(report_filename(Some("reports/")), "resume_report.pdf");
        assert_eq!(report_filename(Some("..")), "resume_report.pdf");
        assert_eq!(report_filename(Some("a/..")), "resume_report.pdf");
    }

    #[test]
    fn plan_strips_directories_from_service_file_name() {
        let raw = RawAnalysisResponse::from_json(json!({
            "data": {},
            "resume_report_id": "r-1",
            "resume_file_name": "../../etc/cv.pdf"
        }))
        .unwrap();
        assert_eq!(plan_download(Some(&raw)).unwrap().filename, "cv_report.pdf");
    }

    #[test]
    fn failed_analysis_explains_missing_report() {
        let raw = RawAnalysisResponse::from_json(json!({ "success": false, "data": {} })).unwrap();
        assert_eq!(
            plan_download(Some(&raw)),
            Err(DownloadError::NoReportGenerated)
        );

        let raw = RawAnalysisResponse::from_json(json!({ "success": true, "data": {} })).unwrap();
        assert_eq!(plan_download(Some(&raw)), Err(DownloadError::MissingReportId));
        assert_eq!(plan_download(None), Err(DownloadError::NoAnalysis));
    }

    #[test]
    fn plan_uses_report_id_and_file_name() {
        let raw = RawAnalysisResponse::from_json(json!({
            "success": true,
            "data": {},
            "resume_report_id": "66f1c0ffee",
            "resume_file_name": "cv.docx"
        }))
        .unwrap();
        assert_eq!(
            plan_download(Some(&raw)),
            Ok(DownloadPlan {
                report_id: "66f1c0ffee".to_string(),
                filename: "cv_report.pdf".to_string(),
            })
        );
    }
}
