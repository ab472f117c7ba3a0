//! Signup form state machine.
//!
//! ```text
//! Editing --begin_submit--> Submitting --finish(success)--> Submitted
//!    ^                          |
//!    +--finish(duplicate/err)---+
//! ```

use tracing::debug;

use crate::client::api::{ClientError, WaitlistApi};
use crate::errors::GENERIC_FAILURE;
use crate::waitlist::{dto::SignupResponse, trade::TradeType};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in your email and select your trade.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Submitted,
}

/// Feedback shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// Local precondition failed; nothing was sent.
    MissingFields,
    InFlight,
    AlreadySubmitted,
}

impl SubmitBlocked {
    pub fn notice(&self) -> Notice {
        match self {
            SubmitBlocked::MissingFields => Notice::Error(MISSING_FIELDS_MESSAGE.into()),
            SubmitBlocked::InFlight => Notice::Info("Your signup is already on its way.".into()),
            SubmitBlocked::AlreadySubmitted => Notice::Info("You're already on the list!".into()),
        }
    }
}

/// What a submission sends to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignup {
    pub email: String,
    pub trade_type: TradeType,
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    email: String,
    trade_type: Option<TradeType>,
    state: FormState,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            trade_type: None,
            state: FormState::Editing,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn trade_type(&self) -> Option<TradeType> {
        self.trade_type
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        if self.state == FormState::Editing {
            self.email = email.into();
        }
    }

    pub fn set_trade(&mut self, trade_type: Option<TradeType>) {
        if self.state == FormState::Editing {
            self.trade_type = trade_type;
        }
    }

    /// Moves to `Submitting` and returns the payload to send.
    pub fn begin_submit(&mut self) -> Result<PendingSignup, SubmitBlocked> {
        match self.state {
            FormState::Submitting => return Err(SubmitBlocked::InFlight),
            FormState::Submitted => return Err(SubmitBlocked::AlreadySubmitted),
            FormState::Editing => {}
        }
        let email = self.email.trim();
        let Some(trade_type) = self.trade_type else {
            return Err(SubmitBlocked::MissingFields);
        };
        if email.is_empty() {
            return Err(SubmitBlocked::MissingFields);
        }
        let pending = PendingSignup {
            email: email.to_string(),
            trade_type,
        };
        self.state = FormState::Submitting;
        Ok(pending)
    }

    /// Applies the service's answer to an in-flight submission.
    pub fn finish(&mut self, result: Result<SignupResponse, ClientError>) -> Notice {
        let notice = match result {
            Ok(res) if res.success => {
                self.state = FormState::Submitted;
                Notice::Success(res.message)
            }
            Ok(res) => {
                self.state = FormState::Editing;
                Notice::Info(res.message)
            }
            Err(e) => {
                self.state = FormState::Editing;
                let message = match e {
                    ClientError::Rejected { message, .. } if !message.is_empty() => message,
                    _ => GENERIC_FAILURE.to_string(),
                };
                Notice::Error(message)
            }
        };
        debug!(state = ?self.state, ?notice, "signup form finished");
        notice
    }

    /// Runs a whole submission against `api`.
    pub async fn submit(&mut self, api: &dyn WaitlistApi) -> Notice {
        let pending = match self.begin_submit() {
            Ok(p) => p,
            Err(blocked) => return blocked.notice(),
        };
        let result = api.signup(&pending.email, pending.trade_type).await;
        self.finish(result)
    }
}
