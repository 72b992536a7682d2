//! Replication health verdict.
//!
//! A replica is healthy when both its IO thread (fetching the master's change
//! stream) and its SQL thread (applying it) report `Yes`. Lag is observed and
//! logged but does not change the verdict.

mod source;
mod status;

pub use source::{MySqlStatusSource, StatusSource, STATUS_QUERY};
pub use status::{StatusRow, StatusValue};

use crate::config::CheckConfig;
use crate::error::CheckError;

/// IO thread state, pre-8.0.22 name first
pub const IO_RUNNING_COLUMNS: &[&str] = &["Slave_IO_Running", "Replica_IO_Running"];

/// SQL thread state, pre-8.0.22 name first
pub const SQL_RUNNING_COLUMNS: &[&str] = &["Slave_SQL_Running", "Replica_SQL_Running"];

/// Replication lag in seconds, pre-8.0.22 name first
pub const LAG_COLUMNS: &[&str] = &["Seconds_Behind_Master", "Seconds_Behind_Source"];

/// Value a running thread reports
const RUNNING: &str = "Yes";

/// Outcome of a check that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Both replication threads are running
    Replicating(StatusRow),
    /// The server has no replica status and that is configured as acceptable
    NotReplica,
}

/// Classify the status row of one server.
pub fn evaluate(row: Option<StatusRow>, config: &CheckConfig) -> Result<Verdict, CheckError> {
    let Some(row) = row else {
        return if config.ignore_non_replica {
            Ok(Verdict::NotReplica)
        } else {
            Err(CheckError::NotReplica)
        };
    };

    if !thread_running(&row, IO_RUNNING_COLUMNS) {
        return Err(CheckError::IoThreadStopped);
    }
    if !thread_running(&row, SQL_RUNNING_COLUMNS) {
        return Err(CheckError::SqlThreadStopped);
    }

    if let Some(lag) = lag_seconds(&row) {
        if lag_exceeds(lag, config.lag_threshold_seconds) {
            tracing::warn!(
                lag_seconds = lag,
                threshold_seconds = config.lag_threshold_seconds,
                "Replica lag exceeds threshold"
            );
        }
    }

    Ok(Verdict::Replicating(row))
}

/// Fetch the status through `source` and classify it.
pub async fn check(source: &dyn StatusSource, config: &CheckConfig) -> Result<Verdict, CheckError> {
    let row = source.fetch_status().await?;
    evaluate(row, config)
}

fn thread_running(row: &StatusRow, columns: &[&str]) -> bool {
    row.get_any(columns).and_then(StatusValue::as_str) == Some(RUNNING)
}

/// Negative lag never exceeds a threshold.
fn lag_exceeds(lag: i64, threshold: u64) -> bool {
    u64::try_from(lag).is_ok_and(|lag| lag > threshold)
}

/// Seconds behind master, when the server reports a number (NULL while stopped).
pub fn lag_seconds(row: &StatusRow) -> Option<i64> {
    row.get_any(LAG_COLUMNS).and_then(StatusValue::as_i64)
}
