use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    errors::{AppError, AppResult},
    waitlist::{
        repo::WaitlistStore,
        repo_types::InsertOutcome,
        trade::TradeType,
    },
};

pub const WELCOME_MESSAGE: &str = "You're on the list! We'll be in touch soon.";
pub const DUPLICATE_MESSAGE: &str = "This email is already on the waitlist!";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const INVALID_TRADE_MESSAGE: &str = "Please select a valid trade";

const MAX_EMAIL_LEN: usize = 320;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").unwrap();
    }
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A signup that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub email: String,
    pub trade_type: TradeType,
}

pub fn validate_signup(email: &str, trade_type: &str) -> AppResult<ValidSignup> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        warn!(email_len = email.len(), "invalid email");
        return Err(AppError::Validation(INVALID_EMAIL_MESSAGE.into()));
    }
    let trade_type = trade_type.parse::<TradeType>().map_err(|e| {
        warn!(error = %e, "invalid trade type");
        AppError::Validation(INVALID_TRADE_MESSAGE.into())
    })?;
    Ok(ValidSignup { email, trade_type })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub success: bool,
    pub message: &'static str,
}

/// Validates and stores one signup. A duplicate email is a normal outcome,
/// not an error; only storage faults surface as `Err`.
pub async fn signup(
    store: &dyn WaitlistStore,
    email: &str,
    trade_type: &str,
) -> AppResult<SignupOutcome> {
    let valid = validate_signup(email, trade_type)?;

    match store.insert(&valid.email, valid.trade_type).await? {
        InsertOutcome::Inserted(signup) => {
            info!(id = signup.id, trade = %signup.trade_type, "waitlist signup added");
            Ok(SignupOutcome {
                success: true,
                message: WELCOME_MESSAGE,
            })
        }
        InsertOutcome::AlreadyExists => {
            info!(trade = %valid.trade_type, "waitlist signup already present");
            Ok(SignupOutcome {
                success: false,
                message: DUPLICATE_MESSAGE,
            })
        }
    }
}

pub async fn count(store: &dyn WaitlistStore) -> AppResult<i64> {
    Ok(store.count().await?)
}
