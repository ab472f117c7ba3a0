use sqlx::FromRow;
use time::OffsetDateTime;

use crate::waitlist::trade::TradeType;

/// Row as stored in `waitlist_signups`.
#[derive(Debug, FromRow)]
pub struct WaitlistSignupRow {
    pub id: i64,
    pub email: String,
    pub trade_type: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistSignup {
    pub id: i64,
    pub email: String,
    pub trade_type: TradeType,
    pub created_at: OffsetDateTime,
}

impl TryFrom<WaitlistSignupRow> for WaitlistSignup {
    type Error = anyhow::Error;

    fn try_from(r: WaitlistSignupRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            trade_type: r.trade_type.parse()?,
            email: r.email,
            created_at: r.created_at,
        })
    }
}

/// Result of a single insert attempt against the email uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(WaitlistSignup),
    AlreadyExists,
}
