//! HTTP client for the to-do backend.
//!
//! Covers the account endpoints (signup, OTP confirmation, login, token
//! refresh, password reset) and the bearer-authenticated `todos/` resource.
//! Nothing here retries; callers decide what a failure means.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::task::{StatusNames, TaskDraft, TaskId, TaskRecord};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Access and refresh tokens handed out by `auth/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Partial update for `PATCH todos/{id}/`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| ApiError::BaseUrl(format!("{trimmed}: {e}")))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("taskers/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: trimmed.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ── Account ────────────────────────────────────────────────────

    pub async fn signup(&self, email: &str, username: &str, password: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("auth/signup/"))
            .json(&json!({ "email": email, "username": username, "password": password }))
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    /// Confirms a signup with the one-time code mailed to `email`.
    pub async fn confirm_registration(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("auth/register/confirm/"))
            .json(&json!({ "email": email, "otp": otp }))
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let resp = self
            .http
            .post(self.url("auth/login/"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Ok(check_response(resp).await?.json().await?)
    }

    /// Exchanges a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.url("auth/token/refresh/"))
            .json(&json!({ "refresh": refresh_token }))
            .send()
            .await?;
        let body: RefreshResponse = check_response(resp).await?.json().await?;
        Ok(body.access)
    }

    pub async fn request_password_reset(&self, access: &str, username: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("auth/password_reset"))
            .bearer_auth(access)
            .json(&json!({ "username": username }))
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        access: &str,
        reset_token: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("auth/password_reset/confirm"))
            .bearer_auth(access)
            .json(&json!({ "token": reset_token, "password": password }))
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    // ── Todos ──────────────────────────────────────────────────────

    pub async fn list_todos(&self, access: &str) -> Result<Vec<TaskRecord>, ApiError> {
        let resp = self
            .http
            .get(self.url("todos/"))
            .bearer_auth(access)
            .send()
            .await?;
        Ok(check_response(resp).await?.json().await?)
    }

    pub async fn create_todo(
        &self,
        access: &str,
        draft: &TaskDraft,
        names: &StatusNames,
    ) -> Result<TaskRecord, ApiError> {
        let resp = self
            .http
            .post(self.url("todos/"))
            .bearer_auth(access)
            .json(&create_body(draft, names))
            .send()
            .await?;
        Ok(check_response(resp).await?.json().await?)
    }

    pub async fn patch_todo(&self, access: &str, id: &TaskId, patch: &TodoPatch) -> Result<(), ApiError> {
        let resp = self
            .http
            .patch(self.url(&format!("todos/{id}/")))
            .bearer_auth(access)
            .json(patch)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    pub async fn delete_todo(&self, access: &str, id: &TaskId) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("todos/{id}/")))
            .bearer_auth(access)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }
}

pub(crate) fn create_body(draft: &TaskDraft, names: &StatusNames) -> Value {
    json!({
        "title": draft.title,
        "status": names.name(draft.bucket),
        "due_date": draft.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        "created_date": draft.created_date.to_rfc3339(),
        "is_special_day": draft.is_special_day,
    })
}

/// Maps 401 to [`ApiError::Unauthorized`] and any other non-success status
/// to [`ApiError::Api`] carrying the server's message.
pub(crate) async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: server_message(&body).unwrap_or(body),
        });
    }
    Ok(resp)
}

/// Pulls `detail` or the first `non_field_errors` entry out of an error body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    if let Some(detail) = value.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    value
        .get("non_field_errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}
