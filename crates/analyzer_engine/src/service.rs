use std::time::Duration;

use analyzer_core::AnalysisRequest;
use analyzer_logging::{analyzer_debug, analyzer_info};
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::{FailureKind, ServiceError};

pub const DEFAULT_BASE_URL: &str = "https://ai-resume-analyzer-9yya.onrender.com";

const UPLOAD_PATH: &str = "upload_resume";
const DOWNLOAD_PATH: &str = "download_reportfile";

/// Connection settings for the remote analysis service.
///
/// Both timeouts are `None` by default: the service gives no latency
/// guarantee and analysis runs can take minutes.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_report_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: None,
            request_timeout: None,
            max_report_bytes: 20 * 1024 * 1024,
        }
    }
}

/// The two HTTP endpoints the client talks to.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    /// `POST /upload_resume`; returns the body of a success-status response.
    async fn upload_resume(&self, request: &AnalysisRequest) -> Result<Bytes, ServiceError>;

    /// `GET /download_reportfile/{report_id}`; returns the report document.
    async fn fetch_report(&self, report_id: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Service handle owning one `reqwest::Client` for the whole session.
#[derive(Debug, Clone)]
pub struct ReqwestAnalysisService {
    client: reqwest::Client,
    settings: ServiceSettings,
}

impl ReqwestAnalysisService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ServiceError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl AnalysisService for ReqwestAnalysisService {
    async fn upload_resume(&self, request: &AnalysisRequest) -> Result<Bytes, ServiceError> {
        let url = self.endpoint(&[UPLOAD_PATH])?;
        let file = Part::bytes(request.file.bytes.clone())
            .file_name(request.file.name.clone())
            .mime_str(&request.file.mime_type)
            .map_err(|err| ServiceError::new(FailureKind::InvalidRequest, err.to_string()))?;
        let form = Form::new()
            .part("uploaded_file", file)
            .text("job_description", request.job_description.clone())
            .text("user_name", request.user_name.clone());

        analyzer_info!(
            "POST {} file={} size={} job_description_len={}",
            url,
            request.file.name,
            request.file.size(),
            request.job_description.len()
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        analyzer_debug!("upload response status {}", status);
        if !status.is_success() {
            return Err(ServiceError::http_status(status.as_u16()));
        }

        response.bytes().await.map_err(map_reqwest_error)
    }

    async fn fetch_report(&self, report_id: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint(&[DOWNLOAD_PATH, report_id])?;
        analyzer_info!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::http_status(status.as_u16()));
        }

        let max_bytes = self.settings.max_report_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        analyzer_debug!("report {} fetched, {} bytes", report_id, bytes.len());
        Ok(bytes)
    }
}

fn too_large(max_bytes: u64, actual: u64) -> ServiceError {
    ServiceError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "report too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
