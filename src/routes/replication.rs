//! Replication status endpoint for load balancers and monitors.
//!
//! Each request opens its own MySQL connection, runs `SHOW SLAVE STATUS`, and
//! answers 200 with the status row as JSON when both replication threads are
//! running. Any failure answers 500 with a plain-text reason.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::CheckError;
use crate::replication::{self, Verdict};
use crate::state::AppState;

/// Replication status handler.
///
/// A server that is not a replica answers `null` when
/// `check.ignore_non_replica` is set.
pub async fn status(State(state): State<AppState>) -> Result<Response, CheckError> {
    let verdict = replication::check(state.source.as_ref(), &state.config.check).await?;

    tracing::info!("Ok");

    let response = match verdict {
        Verdict::Replicating(row) => Json(row).into_response(),
        Verdict::NotReplica => Json(serde_json::Value::Null).into_response(),
    };
    Ok(response)
}
