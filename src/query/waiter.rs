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

//! Cooperative waiting on query status.

use std::time::Duration;

use log::debug;

use crate::errors::{Error, Result};
use crate::executor::{next_message, Deadline, QueryExecutor};
use crate::grpc;
use crate::query::status::{QueryStatus, StatusTracker};
use crate::transport::Backoff;

/// Ladder slept between empty re-subscriptions, so a server that closes the
/// status stream early is not hammered.
fn resubscribe_backoff() -> Backoff {
    Backoff {
        initial: Duration::from_millis(100),
        max: Duration::from_secs(5),
        multiplier: 2.0,
    }
}

/// Blocks (cooperatively) until `predicate` accepts the latest status of
/// `query_id`.
///
/// The wait holds an absolute deadline derived from `timeout` (`None` =
/// unbounded); every status subscription underneath derives its per-call
/// deadline from the time remaining. Ends with:
///
/// - `Ok(status)` as soon as the predicate matches;
/// - [`Error::Server`] / [`Error::Canceled`] when the query fails or is
///   canceled, regardless of the predicate;
/// - [`Error::PredicateUnsatisfied`] when the query reaches a terminal state
///   the predicate still rejects;
/// - [`Error::DeadlineExceeded`] when `timeout` elapses first.
pub async fn wait_for<P>(
    executor: &QueryExecutor,
    query_id: &str,
    timeout: Option<Duration>,
    mut predicate: P,
) -> Result<QueryStatus>
where
    P: FnMut(&QueryStatus) -> bool,
{
    let deadline = Deadline::after(timeout);
    let backoff = resubscribe_backoff();
    let mut tracker = StatusTracker::new();
    let mut round: u32 = 0;
    loop {
        if deadline.expired() {
            return Err(Error::DeadlineExceeded(format!(
                "status wait for {} timed out",
                query_id
            )));
        }
        let call_deadline = executor.call_deadline().min(deadline);
        let mut stream = executor.get_query_info(query_id, &call_deadline).await?;
        while let Some(info) = next_message(&mut stream, &call_deadline).await? {
            let Some(grpc::query_info::Content::QueryStatus(status)) = info.content else {
                continue;
            };
            let observed = tracker.observe(status)?;
            if predicate(observed) {
                return Ok(observed.clone());
            }
        }
        if let Some(latest) = tracker.latest() {
            if latest.execution_finished() {
                return Err(Error::PredicateUnsatisfied {
                    status: latest.clone(),
                });
            }
        }
        round += 1;
        let mut delay = backoff.delay_for(round);
        if let Some(remaining) = deadline.remaining() {
            delay = delay.min(remaining);
        }
        debug!(
            "status stream of {} ended before a match, re-subscribing in {:?}",
            query_id, delay
        );
        tokio::time::sleep(delay).await;
    }
}

/// One-shot view of the current status: subscribes, takes the first status
/// message, drops the stream.
pub(crate) async fn current_status(
    executor: &QueryExecutor,
    query_id: &str,
) -> Result<QueryStatus> {
    let deadline = executor.call_deadline();
    let mut stream = executor.get_query_info(query_id, &deadline).await?;
    let mut tracker = StatusTracker::new();
    while let Some(info) = next_message(&mut stream, &deadline).await? {
        let Some(grpc::query_info::Content::QueryStatus(status)) = info.content else {
            continue;
        };
        return Ok(tracker.observe(status)?.clone());
    }
    Err(Error::Protocol(format!(
        "status stream of {} ended without a status",
        query_id
    )))
}
