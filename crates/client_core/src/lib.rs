use std::sync::{Mutex, MutexGuard};

use reqwest::{header, Client, Response, StatusCode};
use serde_json::{json, Value};
use shared::protocol::{LookupByEmailRequest, SaveCredentialsRequest};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// The address the backend binds by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

const SAVE_PATH: &str = "crud/save_credentials";
const LOOKUP_PATH: &str = "crud/get_by_email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

/// The two text fields of the form. Lives for the session, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub email: String,
    pub password: String,
}

impl FormState {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Email => self.email = value.into(),
            Field::Password => self.password = value.into(),
        }
    }
}

/// Status line and decoded body of a settled HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpExchange {
    pub status: u16,
    pub status_text: String,
    pub data: Value,
}

/// Result of the most recent submitted request. A settled request is exactly
/// one of success, failure, or network error; the enum carries that
/// exclusivity by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(HttpExchange),
    Failure(HttpExchange),
    Network { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Outcome::Network { .. })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{raw}': {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Default)]
struct ControllerState {
    form: FormState,
    loading: bool,
    outcome: Option<Outcome>,
}

/// The form controller: holds the field state, issues the two endpoint
/// requests, and keeps the latest outcome. Nothing serializes overlapping
/// submits; a late settlement from an earlier request overwrites a newer
/// one. Callers wanting exclusivity must gate submission themselves.
#[derive(Debug)]
pub struct CredentialClient {
    http: Client,
    base_url: Url,
    state: Mutex<ControllerState>,
}

impl CredentialClient {
    /// Cookies are retained across requests so cookie-based sessions on the
    /// backend survive between submits.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw).map_err(|source| ClientError::InvalidBaseUrl {
            raw: raw.to_string(),
            source,
        })?;
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url,
            state: Mutex::new(ControllerState::default()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        self.state().form.set(field, value);
    }

    pub fn form(&self) -> FormState {
        self.state().form.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state().outcome.clone()
    }

    /// Clears the outcome display. Form fields and the loading flag are left
    /// untouched.
    pub fn clear_outcome(&self) {
        self.state().outcome = None;
    }

    /// POSTs the full form to the save endpoint. The response body is decoded
    /// as JSON only when the response says it is JSON; anything else is
    /// wrapped as `{"message": <text>}`.
    pub async fn submit_save(&self) -> Outcome {
        let form = self.begin_request();
        let endpoint = self.endpoint(SAVE_PATH);
        debug!(%endpoint, email = %form.email, "submitting save_credentials");
        let request = SaveCredentialsRequest {
            email: form.email,
            password: form.password,
        };

        let outcome = match self
            .http
            .post(&endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => classify_save_response(response).await,
            Err(err) => network_outcome(&err),
        };
        self.settle(outcome)
    }

    /// POSTs `{email}` to the lookup endpoint (POST despite the name). This
    /// path decodes the body as JSON unconditionally, so a 2xx response with
    /// a non-JSON body settles as a network outcome rather than a success.
    pub async fn submit_lookup(&self) -> Outcome {
        let form = self.begin_request();
        let endpoint = self.endpoint(LOOKUP_PATH);
        debug!(%endpoint, email = %form.email, "submitting get_by_email");
        let request = LookupByEmailRequest { email: form.email };

        let outcome = match self
            .http
            .post(&endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                match response.json::<Value>().await {
                    Ok(data) => classify_exchange(status, data),
                    Err(err) => network_outcome(&err),
                }
            }
            Err(err) => network_outcome(&err),
        };
        self.settle(outcome)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Marks the request in flight and drops the previous outcome, returning
    /// the form snapshot the request will carry.
    fn begin_request(&self) -> FormState {
        let mut state = self.state();
        state.loading = true;
        state.outcome = None;
        state.form.clone()
    }

    fn settle(&self, outcome: Outcome) -> Outcome {
        let mut state = self.state();
        state.loading = false;
        state.outcome = Some(outcome.clone());
        outcome
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn classify_save_response(response: Response) -> Outcome {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let data = if is_json {
        match response.json::<Value>().await {
            Ok(value) => value,
            Err(err) => return network_outcome(&err),
        }
    } else {
        match response.text().await {
            Ok(text) => json!({ "message": text }),
            Err(err) => return network_outcome(&err),
        }
    };

    classify_exchange(status, data)
}

fn classify_exchange(status: StatusCode, data: Value) -> Outcome {
    let exchange = HttpExchange {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        data,
    };
    if status.is_success() {
        Outcome::Success(exchange)
    } else {
        Outcome::Failure(exchange)
    }
}

fn network_outcome(err: &reqwest::Error) -> Outcome {
    Outcome::Network {
        message: format!("Network error: {err}"),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
