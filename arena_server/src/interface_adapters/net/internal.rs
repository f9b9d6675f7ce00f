use crate::interface_adapters::protocol::StatsDto;
use crate::interface_adapters::state::AppState;

use axum::extract::{Json, State};
use std::sync::Arc;

/// Latest counters published by the server loop.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    // Copy out before responding so the watch lock is not held.
    let stats = *state.server.stats_rx.borrow();
    Json(stats.into())
}
