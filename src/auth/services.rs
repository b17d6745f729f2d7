use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::{
    dto::RegisterRequest,
    password::{hash_password, verify_password},
};
use crate::db::StoreError;
use crate::error::ApiError;
use crate::users::{repo::UserStore, repo_types::User};

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;
const INVALID_CREDENTIALS: &str = "invalid credentials";

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    // Verified against when the email is unknown so both login failures cost
    // one argon2 run.
    static ref DUMMY_HASH: Option<String> = hash_password("not-a-real-password").ok();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Emails are compared case-insensitively by storing them trimmed and lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks a display name and email pair, returning them normalized.
pub(crate) fn validate_profile(name: &str, email: &str) -> Result<(String, String), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::Validation("name is too long".into()));
    }

    let email = normalize_email(email);
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }
    if email.len() > MAX_EMAIL_LEN || !is_valid_email(&email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    Ok((name.to_string(), email))
}

/// Creates a user from a registration request.
pub async fn register_user(users: &dyn UserStore, req: RegisterRequest) -> Result<User, ApiError> {
    let (name, email) = validate_profile(&req.name, &req.email)?;
    if req.password.is_empty() {
        return Err(ApiError::Validation("password is required".into()));
    }

    let hash = hash_password(&req.password)?;
    match users.insert(&name, &email, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, "user registered");
            Ok(user)
        }
        Err(StoreError::Duplicate) => {
            warn!("registration with an email that is already taken");
            Err(ApiError::Conflict("email already registered".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves the user owning `email` if `password` matches. Unknown email and
/// wrong password fail identically.
pub async fn verify_credential(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("email and password are required".into()));
    }

    let Some(user) = users.find_by_email(&email).await? else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify_password(password, dummy);
        }
        warn!("login for unknown email");
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    }

    Ok(user)
}
