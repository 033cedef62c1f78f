// Copyright 2023-2026 The hyperdb-client authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Error and Result types for the Hyper client.
//!
//! Every error maps to a five-character SQLSTATE through [`Error::sqlstate`].
//! Server-reported SQL errors keep their full diagnostic chain (primary
//! message, hint, detail) in [`ServerError`]; nothing is rewritten on the way
//! out.

use std::fmt;

use crate::grpc;
use crate::query::QueryStatus;

/// SQLSTATE reported for user- or timeout-initiated cancellation.
pub const SQLSTATE_CANCELED: &str = "57014";
/// SQLSTATE for driver-side miscellaneous failures.
pub const SQLSTATE_GENERAL: &str = "HY000";

/// Result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostics of a SQL error reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Five-character ISO SQL state.
    pub sqlstate: String,
    /// Primary human-readable message.
    pub primary_message: String,
    /// Optional suggestion on how to resolve the problem.
    pub hint: Option<String>,
    /// Optional secondary detail.
    pub detail: Option<String>,
}

impl From<grpc::ErrorInfo> for ServerError {
    fn from(info: grpc::ErrorInfo) -> Self {
        let opt = |s: String| if s.is_empty() { None } else { Some(s) };
        ServerError {
            sqlstate: info.sqlstate,
            primary_message: info.primary_message,
            hint: opt(info.hint),
            detail: opt(info.detail),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.sqlstate, self.primary_message)?;
        if let Some(detail) = &self.detail {
            write!(f, "; detail: {}", detail)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {}", hint)?;
        }
        Ok(())
    }
}

/// Failure classification of the driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or conflicting configuration, rejected before any RPC is made.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The transport could not reach the server; surfaced only after the
    /// configured retry attempts are exhausted.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// The query was canceled, by the user or by a query timeout.
    #[error("query canceled: {0}")]
    Canceled(String),

    /// A client-enforced deadline elapsed.
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// SQL error reported by the server, diagnostics preserved verbatim.
    #[error("server error: {0}")]
    Server(ServerError),

    /// The server violated the protocol contract (missing query id,
    /// unexpected message order).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A row range was requested that the server has not produced.
    #[error(
        "row range [{offset}, {}) is not available: server reports {row_count} rows",
        .offset + .limit
    )]
    RowRangeUnavailable {
        /// First requested row.
        offset: u64,
        /// Number of requested rows.
        limit: u64,
        /// Row count advertised by the server.
        row_count: u64,
    },

    /// A chunk range was requested that the server has not produced.
    #[error(
        "chunk range [{chunk_id}, {}) is not available: server reports {chunk_count} chunks",
        .chunk_id + .limit
    )]
    ChunkRangeUnavailable {
        /// First requested chunk.
        chunk_id: u64,
        /// Number of requested chunks.
        limit: u64,
        /// Chunk count advertised by the server.
        chunk_count: u64,
    },

    /// The byte channel was used after `close()`.
    #[error("byte channel is closed")]
    ChannelClosed,

    /// The status stream reached a terminal state without the wait predicate
    /// ever matching.
    #[error("query {} finished without satisfying the wait predicate", .status.query_id)]
    PredicateUnsatisfied {
        /// Last status observed before the stream ended.
        status: QueryStatus,
    },

    /// Any other RPC failure.
    #[error("rpc failed: {0}")]
    Rpc(tonic::Status),
}

impl Error {
    /// The SQLSTATE this error maps to at the cursor surface.
    pub fn sqlstate(&self) -> &str {
        match self {
            Error::Canceled(_) | Error::DeadlineExceeded(_) => SQLSTATE_CANCELED,
            Error::Server(e) => &e.sqlstate,
            _ => SQLSTATE_GENERAL,
        }
    }

    /// Server diagnostics, when this error originated from a server-reported
    /// SQL error.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            Error::Server(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn canceled_by_user() -> Error {
        Error::Canceled("canceled by user".to_string())
    }

    /// Classifies a server-reported [`grpc::ErrorInfo`]: cancellations keep
    /// their SQLSTATE through [`Error::Canceled`], everything else surfaces
    /// as [`Error::Server`].
    pub(crate) fn from_error_info(info: grpc::ErrorInfo) -> Error {
        if info.sqlstate == SQLSTATE_CANCELED {
            Error::Canceled(info.primary_message)
        } else {
            Error::Server(ServerError::from(info))
        }
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Cancelled => Error::Canceled(status.message().to_string()),
            tonic::Code::DeadlineExceeded => {
                Error::DeadlineExceeded(status.message().to_string())
            }
            tonic::Code::Unavailable => Error::Unavailable(status.message().to_string()),
            _ => Error::Rpc(status),
        }
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        Error::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(sqlstate: &str, message: &str) -> grpc::ErrorInfo {
        grpc::ErrorInfo {
            sqlstate: sqlstate.to_string(),
            primary_message: message.to_string(),
            hint: String::new(),
            detail: String::new(),
        }
    }

    #[test]
    fn canceled_errors_map_to_57014() {
        assert_eq!(Error::canceled_by_user().sqlstate(), "57014");
        assert_eq!(Error::DeadlineExceeded("t".into()).sqlstate(), "57014");
    }

    #[test]
    fn server_error_keeps_sqlstate_and_diagnostics() {
        let mut wire = info("22012", "division by zero");
        wire.hint = "do not divide by zero".to_string();
        let err = Error::from_error_info(wire);
        let server = err.server_error().expect("server error");
        assert_eq!(err.sqlstate(), "22012");
        assert_eq!(server.primary_message, "division by zero");
        assert_eq!(server.hint.as_deref(), Some("do not divide by zero"));
        assert_eq!(server.detail, None);
    }

    #[test]
    fn server_cancellation_classifies_as_canceled() {
        let err = Error::from_error_info(info("57014", "canceled by query timeout"));
        assert!(matches!(&err, Error::Canceled(m) if m.contains("query timeout")));
        assert_eq!(err.sqlstate(), "57014");
    }

    #[test]
    fn transport_statuses_classify_by_code() {
        let err = Error::from(tonic::Status::unavailable("connection refused"));
        assert!(matches!(err, Error::Unavailable(_)));
        let err = Error::from(tonic::Status::cancelled("canceled"));
        assert!(matches!(err, Error::Canceled(_)));
        let err = Error::from(tonic::Status::internal("boom"));
        assert!(matches!(err, Error::Rpc(_)));
        assert_eq!(err.sqlstate(), "HY000");
    }
}
