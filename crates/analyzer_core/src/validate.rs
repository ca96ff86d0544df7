use crate::SelectedFile;

/// Submission blocked before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload a resume and paste a job description.")]
    MissingFile,
    #[error("Please upload a resume and paste a job description.")]
    EmptyJobDescription,
    #[error("Please upload a resume and paste a job description.")]
    MissingBoth,
}

/// Checks that a resume is selected and the job description is not blank.
pub fn validate(file: Option<&SelectedFile>, job_description: &str) -> Result<(), ValidationError> {
    let blank = job_description.trim().is_empty();
    match (file, blank) {
        (Some(_), false) => Ok(()),
        (Some(_), true) => Err(ValidationError::EmptyJobDescription),
        (None, false) => Err(ValidationError::MissingFile),
        (None, true) => Err(ValidationError::MissingBoth),
    }
}
