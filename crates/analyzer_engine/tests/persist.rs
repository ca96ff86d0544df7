use std::fs;

use analyzer_engine::{
    ensure_output_dir, save_artifact, AtomicFileWriter, DownloadArtifact, PersistError,
};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("reports");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn saving_report_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let first = save_artifact(
        temp.path(),
        &DownloadArtifact {
            bytes: b"first".to_vec(),
            filename: "cv_report.pdf".to_string(),
        },
    )
    .unwrap();
    assert_eq!(first.file_name().unwrap(), "cv_report.pdf");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = save_artifact(
        temp.path(),
        &DownloadArtifact {
            bytes: b"second".to_vec(),
            filename: "cv_report.pdf".to_string(),
        },
    )
    .unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("cv_report.pdf", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("cv_report.pdf").exists());
}

#[test]
fn rejects_names_that_leave_the_output_dir() {
    let temp = TempDir::new().unwrap();
    let reports = temp.path().join("reports");
    let writer = AtomicFileWriter::new(reports.clone());

    for name in ["../escaped_report.pdf", "nested/cv_report.pdf", "..", "", "cv/"] {
        let result = writer.write(name, b"data");
        assert!(
            matches!(result, Err(PersistError::InvalidFileName(_))),
            "{name:?} was accepted"
        );
    }
    let absolute = temp.path().join("abs_report.pdf");
    assert!(matches!(
        writer.write(absolute.to_str().unwrap(), b"data"),
        Err(PersistError::InvalidFileName(_))
    ));

    assert!(!temp.path().join("escaped_report.pdf").exists());
    assert!(!absolute.exists());
    assert!(!reports.exists());
}
