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

use crate::errors::{Error, Result, SQLSTATE_CANCELED};
use crate::grpc;

/// Where a query stands in its lifecycle.
///
/// The wire carries three completion values plus an optional error;
/// `Canceled` and `Failed` are derived here from the error's SQLSTATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Still executing; more chunks may appear.
    Running,
    /// Every chunk is produced and fetchable; execution may still be
    /// finishing up.
    ResultsProduced,
    /// Execution finished and all results are retained.
    Finished,
    /// Canceled by the user or by a query timeout.
    Canceled,
    /// Failed with a server-reported SQL error.
    Failed,
}

impl CompletionStatus {
    /// Whether the state can never change again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CompletionStatus::Finished | CompletionStatus::Canceled | CompletionStatus::Failed
        )
    }
}

/// A point-in-time view of a query's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStatus {
    /// Server-assigned query identifier.
    pub query_id: String,
    /// Lifecycle state, see [`CompletionStatus`].
    pub completion: CompletionStatus,
    /// Chunks produced so far; monotonic non-decreasing.
    pub chunk_count: u64,
    /// Rows produced so far; monotonic non-decreasing.
    pub row_count: u64,
    /// Execution progress in `[0, 1]`.
    pub progress: f64,
}

impl QueryStatus {
    /// Whether chunks `[0, chunk_count)` are all retrievable.
    pub fn all_results_produced(&self) -> bool {
        matches!(
            self.completion,
            CompletionStatus::ResultsProduced | CompletionStatus::Finished
        )
    }

    /// Whether execution has reached a terminal state.
    pub fn execution_finished(&self) -> bool {
        self.completion.is_terminal()
    }
}

/// Accumulates wire statuses for one query, enforcing the protocol's
/// monotonicity invariants: counters never go backwards and a terminal state
/// is sticky.
#[derive(Debug, Default)]
pub struct StatusTracker {
    latest: Option<QueryStatus>,
}

impl StatusTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        StatusTracker::default()
    }

    /// The most recent merged status.
    pub fn latest(&self) -> Option<&QueryStatus> {
        self.latest.as_ref()
    }

    /// Merges one wire status. A server-reported error surfaces as the
    /// corresponding [`Error`] after the status is recorded, so `latest`
    /// still reflects the terminal state.
    pub fn observe(&mut self, wire: grpc::QueryStatus) -> Result<&QueryStatus> {
        let error = wire.error.clone();
        let incoming = domain_status(&wire);
        if let Some(current) = &self.latest {
            if !current.query_id.is_empty()
                && !incoming.query_id.is_empty()
                && current.query_id != incoming.query_id
            {
                return Err(Error::Protocol(format!(
                    "query id changed mid-stream: {} then {}",
                    current.query_id, incoming.query_id
                )));
            }
        }
        let merged = match self.latest.take() {
            None => incoming,
            Some(current) => merge(current, incoming),
        };
        self.latest = Some(merged);
        if let Some(info) = error {
            return Err(Error::from_error_info(info));
        }
        Ok(self.latest.as_ref().expect("status recorded"))
    }
}

fn domain_status(wire: &grpc::QueryStatus) -> QueryStatus {
    let completion = match &wire.error {
        Some(info) if info.sqlstate == SQLSTATE_CANCELED => CompletionStatus::Canceled,
        Some(_) => CompletionStatus::Failed,
        None => match wire.completion_status() {
            grpc::CompletionStatus::RunningOrUnspecified => CompletionStatus::Running,
            grpc::CompletionStatus::ResultsProduced => CompletionStatus::ResultsProduced,
            grpc::CompletionStatus::Finished => CompletionStatus::Finished,
        },
    };
    QueryStatus {
        query_id: wire.query_id.clone(),
        completion,
        chunk_count: wire.chunk_count,
        row_count: wire.row_count,
        progress: wire.progress.clamp(0.0, 1.0),
    }
}

fn merge(current: QueryStatus, incoming: QueryStatus) -> QueryStatus {
    let completion = if current.completion.is_terminal() {
        current.completion
    } else {
        incoming.completion
    };
    QueryStatus {
        query_id: if current.query_id.is_empty() {
            incoming.query_id
        } else {
            current.query_id
        },
        completion,
        chunk_count: current.chunk_count.max(incoming.chunk_count),
        row_count: current.row_count.max(incoming.row_count),
        progress: current.progress.max(incoming.progress),
    }
}
