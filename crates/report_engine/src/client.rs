use std::time::Duration;

use client_logging::{client_debug, client_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    is_quota_error, ClientError, CreateTaskBody, CreateTaskResponse, FailureKind,
    TaskStatusPayload,
};

const CREATE_SEGMENT: &str = "news-report";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base of the task endpoints, e.g. `http://localhost:8000/api/tasks`.
    pub tasks_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            tasks_base: "http://localhost:8000/api/tasks".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
        }
    }
}

/// The two task-service endpoints the client consumes.
#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_task(&self, body: &CreateTaskBody) -> Result<CreateTaskResponse, ClientError>;

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusPayload, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTaskApi {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestTaskApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        // Fail early on a bad base rather than on the first click.
        Url::parse(&settings.tasks_base)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, segment: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.settings.tasks_base)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::new(FailureKind::InvalidUrl, "base cannot hold a path"))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl TaskApi for ReqwestTaskApi {
    async fn create_task(&self, body: &CreateTaskBody) -> Result<CreateTaskResponse, ClientError> {
        let url = self.endpoint(CREATE_SEGMENT)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        client_debug!("POST {} prompt_len={}", url, body.user_prompt.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            client_warn!(
                "Task creation rejected: {} body={}",
                status,
                String::from_utf8_lossy(&bytes)
            );
            if is_quota_error(&bytes) {
                return Err(ClientError::new(
                    FailureKind::QuotaExceeded,
                    status.to_string(),
                ));
            }
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let created: CreateTaskResponse = decode(&bytes)?;
        if created.task_id.trim().is_empty() {
            return Err(ClientError::new(FailureKind::Decode, "empty task_id"));
        }
        Ok(created)
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusPayload, ClientError> {
        let url = self.endpoint(task_id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        decode(&bytes)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(bytes).map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
