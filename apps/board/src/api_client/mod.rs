//! ATS API client — the single point of entry for all backend calls.
//!
//! Every request carries the bearer token. The board read retries transient
//! failures; the stage write never retries (a failed move is rolled back and
//! the user re-drags).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::board::store::{BoardSource, StageStore};
use crate::config::Config;
use crate::errors::BoardError;
use crate::models::application::{Application, ApplicationDetail, Stage, StageUpdate};

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct AtsClient {
    client: Client,
    base_url: String,
    token: String,
}

impl AtsClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, BoardError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, BoardError> {
        Self::new(
            config.api_url.clone(),
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    /// `GET /applications/board`. Retries 429/5xx and transport errors with
    /// exponential backoff.
    pub async fn fetch_board(&self) -> Result<Vec<Application>, BoardError> {
        let url = self.url("/applications/board");
        let mut last_error: Option<BoardError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(RETRY_BASE_DELAY_MS * (1 << (attempt - 1)));
                warn!(
                    "Board fetch attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let result = match self.authorized(self.client.get(&url)).send().await {
                Ok(response) => read_json::<Vec<Application>>(response).await,
                Err(e) => Err(BoardError::Http(e)),
            };

            match result {
                Ok(applications) => {
                    debug!("Fetched board: {} applications", applications.len());
                    return Ok(applications);
                }
                Err(e) if e.is_transient() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(BoardError::Api {
            status: 503,
            message: format!("board fetch failed after {MAX_RETRIES} attempts"),
        }))
    }

    /// `PUT /applications/{id}/stage`. Any 2xx is success.
    pub async fn update_stage(&self, application_id: i64, stage: Stage) -> Result<(), BoardError> {
        let url = self.url(&format!("/applications/{application_id}/stage"));
        let response = self
            .authorized(self.client.put(&url))
            .json(&StageUpdate { stage })
            .send()
            .await?;

        check_status(response).await?;
        debug!("Persisted stage {stage} for application {application_id}");
        Ok(())
    }

    /// `GET /applications/{id}`.
    pub async fn get_application(&self, application_id: i64) -> Result<ApplicationDetail, BoardError> {
        let url = self.url(&format!("/applications/{application_id}"));
        let response = self.authorized(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BoardError::NotFound(format!(
                "Application {application_id} not found"
            )));
        }
        read_json(response).await
    }
}

#[async_trait]
impl StageStore for AtsClient {
    async fn update_stage(&self, application_id: i64, stage: Stage) -> Result<(), BoardError> {
        AtsClient::update_stage(self, application_id, stage).await
    }
}

#[async_trait]
impl BoardSource for AtsClient {
    async fn fetch_board(&self) -> Result<Vec<Application>, BoardError> {
        AtsClient::fetch_board(self).await
    }
}

/// Maps non-2xx responses to `BoardError`, extracting the backend's
/// `{"error": ...}` / `{"message": ...}` text when present.
async fn check_status(response: Response) -> Result<Response, BoardError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(BoardError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BoardError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BoardError> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(BoardError::Parse)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.trim().to_string())
}
