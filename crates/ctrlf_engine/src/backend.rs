use std::time::Duration;

use ctrlf_logging::{ctrlf_debug, ctrlf_warn};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::{BackendError, FailureKind, StatusReport, SubmitReceipt, UploadPayload};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// `None` leaves requests bounded only by the transport.
    pub request_timeout: Option<Duration>,
}

impl BackendSettings {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base address"),
            ));
        }
        Ok(Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        })
    }
}

/// The two remote operations the uploader depends on.
#[async_trait::async_trait]
pub trait JobBackend: Send + Sync {
    /// Creates a new backend job for the file. Not idempotent.
    async fn submit_job(&self, upload: &UploadPayload) -> Result<SubmitReceipt, BackendError>;

    async fn job_status(&self, job_id: &str) -> Result<StatusReport, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BackendError::new(FailureKind::InvalidUrl, "backend url cannot be a base")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl JobBackend for ReqwestBackend {
    async fn submit_job(&self, upload: &UploadPayload) -> Result<SubmitReceipt, BackendError> {
        let url = self.endpoint(&["upload"])?;
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)
            .map_err(|err| BackendError::new(FailureKind::InvalidRequest, err.to_string()))?;
        let form = Form::new().part("file", part);

        ctrlf_debug!(
            "POST {} file={} bytes={}",
            url,
            upload.file_name,
            upload.bytes.len()
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = check_status(response).await?;
        response
            .json::<SubmitReceipt>()
            .await
            .map_err(map_reqwest_error)
    }

    async fn job_status(&self, job_id: &str) -> Result<StatusReport, BackendError> {
        let url = self.endpoint(&["status", job_id])?;
        ctrlf_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = check_status(response).await?;
        response
            .json::<StatusReport>()
            .await
            .map_err(map_reqwest_error)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .map(|body| match body.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });

    ctrlf_warn!("Backend answered {} detail={:?}", code, detail);
    Err(match detail {
        Some(detail) => BackendError::new(
            FailureKind::Rejected {
                status: code,
                detail: detail.clone(),
            },
            detail,
        ),
        None => BackendError::new(FailureKind::HttpStatus(code), status.to_string()),
    })
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::Decode, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
