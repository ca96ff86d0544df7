/// Placeholder user name sent with every upload until an identity provider supplies one.
pub const DEFAULT_USER_NAME: &str = "xyz";

/// A resume chosen by the user, held in memory for the current attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Builds a selection, deriving the MIME type from the file extension.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_for_filename(&name).to_string();
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in megabytes with two decimals, as shown next to the file name.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// Content type for the accepted resume formats; anything else is sent as a raw octet stream.
pub fn mime_for_filename(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Everything the upload endpoint needs for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file: SelectedFile,
    pub job_description: String,
    pub user_name: String,
}
