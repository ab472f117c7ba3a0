pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod trade;

use crate::state::AppState;
use axum::Router;

pub use repo::{MemoryWaitlistStore, PgWaitlistStore, WaitlistStore};
pub use trade::TradeType;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::waitlist_routes())
}
