//! replica-health: MySQL replication status over HTTP.
//!
//! Answers every request on one path by checking `SHOW SLAVE STATUS` on a
//! MySQL server: 200 with the status row as JSON while both replication
//! threads run, 500 with a plain-text reason otherwise.

pub mod config;
pub mod dsn;
pub mod error;
pub mod http;
pub mod middleware;
pub mod replication;
pub mod routes;
pub mod state;

pub use error::CheckError;
pub use routes::create_router;
pub use state::AppState;
