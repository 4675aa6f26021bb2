use serde::Deserialize;
use serde_json::json;

use crate::model::Task;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// The API surface the TUI controller talks to. A trait so controller logic
/// can be tested headlessly against a stub instead of a live server.
pub trait TasksApi {
    fn list(&self) -> Result<Vec<Task>, ClientError>;
    fn create(&self, text: &str) -> Result<Task, ClientError>;
    fn edit(&self, id: i64, text: &str) -> Result<Task, ClientError>;
    fn toggle(&self, id: i64) -> Result<Task, ClientError>;
    fn delete(&self, id: i64) -> Result<(), ClientError>;
}

/// Blocking HTTP client for the task API. The TUI event loop is synchronous,
/// so requests block in place; there is exactly one in flight at a time.
pub struct HttpTasksApi {
    base_url: String,
    http: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpTasksApi {
    pub fn new(api_url: &str) -> Self {
        HttpTasksApi {
            base_url: api_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/tasks{}", self.base_url, path)
    }

    /// Map a non-2xx response to `ClientError::Api`, pulling the message out
    /// of the `{"error"}` body when there is one.
    fn check(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl TasksApi for HttpTasksApi {
    fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = Self::check(self.http.get(self.url("")).send()?)?;
        Ok(response.json()?)
    }

    fn create(&self, text: &str) -> Result<Task, ClientError> {
        let response = Self::check(
            self.http
                .post(self.url(""))
                .json(&json!({ "text": text }))
                .send()?,
        )?;
        Ok(response.json()?)
    }

    fn edit(&self, id: i64, text: &str) -> Result<Task, ClientError> {
        let response = Self::check(
            self.http
                .put(self.url(&format!("/{}", id)))
                .json(&json!({ "text": text }))
                .send()?,
        )?;
        Ok(response.json()?)
    }

    fn toggle(&self, id: i64) -> Result<Task, ClientError> {
        let response = Self::check(
            self.http
                .put(self.url(&format!("/{}/toggle", id)))
                .send()?,
        )?;
        Ok(response.json()?)
    }

    fn delete(&self, id: i64) -> Result<(), ClientError> {
        Self::check(self.http.delete(self.url(&format!("/{}", id))).send()?)?;
        Ok(())
    }
}
