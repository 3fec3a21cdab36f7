use shared::protocol::CredentialSummary;
use storage::Storage;

use crate::error::{AppError, AppResult};

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::validation("Email cannot be empty"));
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(AppError::invalid_email(email));
    }
    Ok(())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters long",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::validation(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::validation(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "Password must contain at least one digit",
        ));
    }
    Ok(())
}

pub async fn save_credentials(
    storage: &Storage,
    email: &str,
    password: &str,
) -> AppResult<CredentialSummary> {
    validate_email(email)?;
    validate_password(password)?;

    let normalized = normalize_email(email);
    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let stored = storage.insert_credential(&normalized, &password_hash).await?;
    Ok(CredentialSummary::redacted(stored.email))
}

pub async fn lookup_by_email(storage: &Storage, email: &str) -> AppResult<CredentialSummary> {
    validate_email(email)?;

    let normalized = normalize_email(email);
    match storage.find_by_email(&normalized).await? {
        Some(stored) => Ok(CredentialSummary::redacted(stored.email)),
        None => Err(AppError::not_found("User")),
    }
}
