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

use std::sync::Arc;

use log::debug;

use crate::errors::{Error, Result};
use crate::executor::{next_message, QueryExecutor};
use crate::grpc;
use crate::parameters::QueryParameter;
use crate::query::status::{QueryStatus, StatusTracker};
use crate::query::TransferMode;

/// Handle to a query submitted asynchronously.
///
/// Submission reads the first-call stream only until the server assigns a
/// query id, then returns control; no results flow through the handle. Pair
/// it with [`wait_for`](crate::query::wait_for) and the range readers to
/// collect the results out of band.
#[derive(Debug, Clone)]
pub struct AsyncQueryHandle {
    query_id: String,
    submitted: Option<QueryStatus>,
}

impl AsyncQueryHandle {
    /// Submits `sql` in ASYNC mode and captures the query id from the first
    /// status message. A first-call stream that ends without one is a
    /// protocol error.
    pub(crate) async fn submit(
        executor: &Arc<QueryExecutor>,
        sql: &str,
        parameters: &[QueryParameter],
    ) -> Result<Self> {
        let (mut stream, deadline) = executor
            .execute_query(sql, parameters, TransferMode::Async)
            .await?;
        let mut tracker = StatusTracker::new();
        while let Some(response) = next_message(&mut stream, &deadline).await? {
            let info = match response.response {
                Some(grpc::execute_query_response::Response::QueryInfo(info)) => Some(info),
                Some(grpc::execute_query_response::Response::QueryResult(result)) => {
                    match result.result {
                        Some(grpc::query_result::Result::QueryInfo(info)) => Some(info),
                        _ => None,
                    }
                }
                None => None,
            };
            let Some(grpc::query_info::Content::QueryStatus(status)) =
                info.and_then(|i| i.content)
            else {
                continue;
            };
            let observed = tracker.observe(status)?;
            if !observed.query_id.is_empty() {
                debug!("async submission assigned {}", observed.query_id);
                // The server may keep streaming; the rest is intentionally
                // left unread.
                return Ok(AsyncQueryHandle {
                    query_id: observed.query_id.clone(),
                    submitted: Some(observed.clone()),
                });
            }
        }
        Err(Error::Protocol(
            "async execution ended without a query id".to_string(),
        ))
    }

    /// The server-assigned query id.
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    /// The status observed at submission time, if any.
    pub fn submitted_status(&self) -> Option<&QueryStatus> {
        self.submitted.as_ref()
    }
}
