use serde::{Deserialize, Serialize};

/// Body of `POST /crud/save_credentials`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /crud/get_by_email` (POST despite the name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupByEmailRequest {
    pub email: String,
}

/// Credential view returned by both endpoints. The `password` field always
/// carries the literal `[REDACTED]` on the wire; stored hashes never leave
/// the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSummary {
    pub email: String,
    pub password: String,
}

pub const REDACTED_PASSWORD: &str = "[REDACTED]";

impl CredentialSummary {
    pub fn redacted(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: REDACTED_PASSWORD.to_string(),
        }
    }
}
