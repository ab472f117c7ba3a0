use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    errors::AppResult,
    state::AppState,
    waitlist::{
        dto::{CountResponse, SignupRequest, SignupResponse, TradesResponse},
        services,
        trade::TradeType,
    },
};

pub fn waitlist_routes() -> Router<AppState> {
    Router::new()
        .route("/waitlist/signup", post(signup))
        .route("/waitlist/count", get(count))
        .route("/waitlist/trades", get(trades))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let outcome =
        services::signup(state.store.as_ref(), &payload.email, &payload.trade_type).await?;
    Ok(Json(SignupResponse {
        success: outcome.success,
        message: outcome.message.to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> AppResult<Json<CountResponse>> {
    let count = services::count(state.store.as_ref()).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn trades() -> Json<TradesResponse> {
    Json(TradesResponse {
        trades: TradeType::ALL.iter().map(|t| t.as_str().to_string()).collect(),
    })
}
