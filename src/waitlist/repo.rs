use std::{collections::HashSet, sync::Mutex};

use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::waitlist::{
    repo_types::{InsertOutcome, WaitlistSignup, WaitlistSignupRow},
    trade::TradeType,
};

/// Name of the unique constraint on `waitlist_signups.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "waitlist_signups_email_key";

/// Persistence for waitlist signups.
///
/// `insert` must enforce email uniqueness itself and report a conflict as
/// [`InsertOutcome::AlreadyExists`]; callers never check before inserting.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn insert(&self, email: &str, trade_type: TradeType) -> anyhow::Result<InsertOutcome>;
    async fn count(&self) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgWaitlistStore {
    db: PgPool,
}

impl PgWaitlistStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_email_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

#[async_trait]
impl WaitlistStore for PgWaitlistStore {
    async fn insert(&self, email: &str, trade_type: TradeType) -> anyhow::Result<InsertOutcome> {
        let res = sqlx::query_as::<_, WaitlistSignupRow>(
            r#"
            INSERT INTO waitlist_signups (email, trade_type)
            VALUES ($1, $2)
            RETURNING id, email, trade_type, created_at
            "#,
        )
        .bind(email)
        .bind(trade_type.as_str())
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(row) => Ok(InsertOutcome::Inserted(row.try_into()?)),
            Err(e) if is_email_conflict(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => Err(e).context("insert waitlist signup"),
        }
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM waitlist_signups"#)
            .fetch_one(&self.db)
            .await
            .context("count waitlist signups")?;
        Ok(count)
    }
}

#[derive(Default)]
struct MemoryInner {
    emails: HashSet<String>,
    rows: Vec<WaitlistSignup>,
}

/// In-process store. The uniqueness check and the insert happen under one
/// lock, so it offers the same guarantee as the database constraint.
#[derive(Default)]
pub struct MemoryWaitlistStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<WaitlistSignup> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock still holds consistent data: every mutation is a
        // single push after the set insert succeeded.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl WaitlistStore for MemoryWaitlistStore {
    async fn insert(&self, email: &str, trade_type: TradeType) -> anyhow::Result<InsertOutcome> {
        let mut inner = self.lock();
        if !inner.emails.insert(email.to_string()) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        let signup = WaitlistSignup {
            id: inner.rows.len() as i64 + 1,
            email: email.to_string(),
            trade_type,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.rows.push(signup.clone());
        Ok(InsertOutcome::Inserted(signup))
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.lock().rows.len() as i64)
    }
}

#[cfg(test)]
mod conflict_tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("database rejected the row")]
    struct FakeDbError {
        kind: ErrorKind,
        constraint: Option<&'static str>,
    }

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "database rejected the row"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: ErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { kind, constraint }))
    }

    #[test]
    fn unique_violation_on_email_is_a_conflict() {
        let err = db_error(ErrorKind::UniqueViolation, Some(EMAIL_UNIQUE_CONSTRAINT));
        assert!(is_email_conflict(&err));
    }

    #[test]
    fn unique_violation_on_other_constraint_is_not() {
        let err = db_error(ErrorKind::UniqueViolation, Some("waitlist_signups_pkey"));
        assert!(!is_email_conflict(&err));
        let err = db_error(ErrorKind::UniqueViolation, None);
        assert!(!is_email_conflict(&err));
    }

    #[test]
    fn check_violation_is_not_a_conflict() {
        let err = db_error(
            ErrorKind::CheckViolation,
            Some("waitlist_signups_trade_type_check"),
        );
        assert!(!is_email_conflict(&err));
    }

    #[test]
    fn non_database_errors_are_not_conflicts() {
        assert!(!is_email_conflict(&sqlx::Error::RowNotFound));
        assert!(!is_email_conflict(&sqlx::Error::PoolTimedOut));
    }
}
