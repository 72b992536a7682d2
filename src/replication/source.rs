//! Where replica status rows come from.
//!
//! `MySqlStatusSource` opens a fresh connection for every call, runs
//! `SHOW SLAVE STATUS`, and closes the connection before returning. Tests
//! substitute their own `StatusSource`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row};

use super::status::StatusRow;
use crate::error::CheckError;

/// Query run against the server for every check
pub const STATUS_QUERY: &str = "SHOW SLAVE STATUS";

/// Produces the current replica status of one server.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// First row of the replica status, or `None` if the server is not a replica.
    async fn fetch_status(&self) -> Result<Option<StatusRow>, CheckError>;
}

/// Reads replica status from a MySQL server, one connection per call.
pub struct MySqlStatusSource {
    options: MySqlConnectOptions,
    timeout: Option<Duration>,
    query: String,
}

impl MySqlStatusSource {
    /// Without a timeout a hung server blocks the calling request indefinitely.
    pub fn new(options: MySqlConnectOptions, timeout: Option<Duration>) -> Self {
        Self {
            options,
            timeout,
            query: STATUS_QUERY.to_string(),
        }
    }

    /// Replace the status query, e.g. with `SHOW REPLICA STATUS` on servers
    /// that no longer accept the old statement. Only the first row is read.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    async fn connect_and_query(&self) -> Result<Option<StatusRow>, CheckError> {
        let mut conn = self
            .options
            .connect()
            .await
            .map_err(CheckError::Connect)?;

        let result = query_status(&mut conn, &self.query).await;

        // An early error return above drops the connection, which also closes it.
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Failed to close MySQL connection cleanly");
        }

        result
    }
}

#[async_trait]
impl StatusSource for MySqlStatusSource {
    async fn fetch_status(&self) -> Result<Option<StatusRow>, CheckError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.connect_and_query())
                .await
                .map_err(|_| CheckError::Timeout(limit))?,
            None => self.connect_and_query().await,
        }
    }
}

async fn query_status(
    conn: &mut MySqlConnection,
    query: &str,
) -> Result<Option<StatusRow>, CheckError> {
    // raw_sql uses the text protocol, so every value arrives as bytes we can
    // re-type ourselves regardless of the server's column types.
    let row = Executor::fetch_optional(&mut *conn, sqlx::raw_sql(query))
        .await
        .map_err(CheckError::Query)?;

    row.map(|row| read_row(&row)).transpose()
}

fn read_row(row: &MySqlRow) -> Result<StatusRow, CheckError> {
    let mut columns = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let raw: Option<Vec<u8>> = row.try_get_unchecked(index).map_err(CheckError::Query)?;
        columns.push((column.name(), raw));
    }
    Ok(status_from_columns(columns))
}

/// Build a status row from raw text-protocol values. NULL stays `None` here
/// and becomes the empty string in the row.
fn status_from_columns<'a, B: AsRef<[u8]>>(
    columns: impl IntoIterator<Item = (&'a str, Option<B>)>,
) -> StatusRow {
    let mut status = StatusRow::new();
    for (name, raw) in columns {
        let text = raw.map(|bytes| String::from_utf8_lossy(bytes.as_ref()).into_owned());
        status.insert_raw(name, text.as_deref());
    }
    status
}
