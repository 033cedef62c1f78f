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

//! The adaptive execution state machine.
//!
//! The first call returns a short inline burst: status, optionally the
//! schema, optionally the first chunk. After the burst the machine alternates
//! between fetching chunks it knows exist and polling status to learn about
//! more, until the query is terminal and every advertised chunk was emitted:
//!
//! ```text
//! DRAIN_INLINE -> DECIDE -> FETCH_KNOWN -+-> DONE | FAILED | CANCELED
//!                   ^    \-> POLL_STATUS |
//!                   +--------------------+
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use tonic::Streaming;

use crate::errors::{Error, Result};
use crate::executor::{next_message, Deadline, QueryExecutor};
use crate::grpc;
use crate::parameters::QueryParameter;
use crate::query::byte_channel::PayloadStream;
use crate::query::status::{QueryStatus, StatusTracker};
use crate::query::TransferMode;

enum MachineState {
    DrainInline {
        stream: Streaming<grpc::ExecuteQueryResponse>,
        deadline: Deadline,
    },
    Decide,
    FetchKnown {
        stream: Streaming<grpc::QueryResult>,
        deadline: Deadline,
        requested: u64,
    },
    PollStatus {
        stream: Streaming<grpc::QueryInfo>,
        deadline: Deadline,
    },
    Done,
}

enum Step {
    Inline(Option<grpc::ExecuteQueryResponse>),
    InlineEnded,
    Fetched(Option<grpc::QueryResult>),
    FetchEnded(u64),
    Polled(Option<grpc::QueryInfo>),
    PollEnded,
    Decide,
    Done,
}

/// Pull iterator over the result frames of one adaptively-executed query.
///
/// Single-consumer: the machine pulls exactly one wire message from its
/// active upstream per emitted frame, so the server paces the client. A
/// machine is bound to exactly one query; re-execution is impossible by
/// construction because [`execute`](Self::execute) is the only way to get
/// one.
pub struct AdaptiveQueryStream {
    executor: Arc<QueryExecutor>,
    state: MachineState,
    tracker: StatusTracker,
    query_id: Option<String>,
    pending: VecDeque<Bytes>,
    emitted_chunks: u64,
    schema_delivered: bool,
    closed: bool,
}

impl AdaptiveQueryStream {
    /// Submits `sql` in adaptive mode and returns the machine positioned at
    /// the start of the inline burst.
    pub(crate) async fn execute(
        executor: Arc<QueryExecutor>,
        sql: &str,
        parameters: &[QueryParameter],
    ) -> Result<Self> {
        let (stream, deadline) = executor
            .execute_query(sql, parameters, TransferMode::Adaptive)
            .await?;
        Ok(AdaptiveQueryStream {
            executor,
            state: MachineState::DrainInline { stream, deadline },
            tracker: StatusTracker::new(),
            query_id: None,
            pending: VecDeque::new(),
            emitted_chunks: 0,
            schema_delivered: false,
            closed: false,
        })
    }

    /// The server-assigned query id, once the first status arrived.
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// The latest status observed by this machine.
    pub fn status(&self) -> Option<&QueryStatus> {
        self.tracker.latest()
    }

    /// The next result frame, in chunk order, or `Ok(None)` once the query
    /// is terminal and every advertised chunk was emitted.
    pub async fn next(&mut self) -> Result<Option<Bytes>> {
        loop {
            if self.closed {
                return Err(Error::canceled_by_user());
            }
            if self.query_id.is_some() {
                if let Some(frame) = self.pending.pop_front() {
                    return Ok(Some(frame));
                }
            }
            let step = match &mut self.state {
                MachineState::DrainInline { stream, deadline } => {
                    let deadline = *deadline;
                    match next_message(stream, &deadline).await {
                        Ok(Some(response)) => Step::Inline(Some(response)),
                        Ok(None) => Step::InlineEnded,
                        Err(err) => return self.fail(err),
                    }
                }
                MachineState::FetchKnown {
                    stream,
                    deadline,
                    requested,
                } => {
                    let deadline = *deadline;
                    let requested = *requested;
                    match next_message(stream, &deadline).await {
                        Ok(Some(result)) => Step::Fetched(Some(result)),
                        Ok(None) => Step::FetchEnded(requested),
                        Err(err) => return self.fail(err),
                    }
                }
                MachineState::PollStatus { stream, deadline } => {
                    let deadline = *deadline;
                    match next_message(stream, &deadline).await {
                        Ok(Some(info)) => Step::Polled(Some(info)),
                        Ok(None) => Step::PollEnded,
                        Err(err) => return self.fail(err),
                    }
                }
                MachineState::Decide => Step::Decide,
                MachineState::Done => Step::Done,
            };
            match step {
                Step::Inline(Some(response)) => {
                    if let Err(err) = self.absorb_execute_response(response) {
                        return self.fail(err);
                    }
                }
                Step::InlineEnded => {
                    if self.query_id.is_none() {
                        return self.fail(Error::Protocol(
                            "first-call stream ended without a query id".to_string(),
                        ));
                    }
                    debug!(
                        "inline burst of {} drained",
                        self.query_id.as_deref().unwrap_or_default()
                    );
                    self.state = MachineState::Decide;
                }
                Step::Fetched(Some(result)) => {
                    if let Err(err) = self.absorb_query_result(result, false) {
                        return self.fail(err);
                    }
                }
                Step::FetchEnded(requested) => {
                    self.emitted_chunks += requested;
                    self.state = MachineState::Decide;
                }
                Step::Polled(Some(info)) => {
                    if let Err(err) = self.absorb_query_info(info) {
                        return self.fail(err);
                    }
                }
                Step::PollEnded => self.state = MachineState::Decide,
                Step::Decide => {
                    if let Err(err) = self.decide().await {
                        return self.fail(err);
                    }
                }
                Step::Done => return Ok(None),
                Step::Inline(None) | Step::Fetched(None) | Step::Polled(None) => {
                    unreachable!("message presence handled above")
                }
            }
        }
    }

    /// Closes the machine: drops any in-flight stream, cancels the query at
    /// the server when it is still running, and makes subsequent reads fail
    /// with a CANCELED error. Idempotent.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let running = !matches!(self.state, MachineState::Done)
            && !self.status().map(QueryStatus::execution_finished).unwrap_or(false);
        self.state = MachineState::Done;
        if running {
            if let Some(query_id) = self.query_id.clone() {
                debug!("canceling {} on close", query_id);
                if let Err(err) = self.executor.cancel_query(&query_id).await {
                    debug!("cancel of {} on close failed: {}", query_id, err);
                }
            }
        }
    }

    /// The machine as a [`futures::Stream`] of result frames.
    pub fn into_stream(self) -> impl futures::Stream<Item = Result<Bytes>> + Unpin {
        Box::pin(futures::stream::unfold(self, |mut machine| async move {
            match machine.next().await {
                Ok(Some(frame)) => Some((Ok(frame), machine)),
                Ok(None) => None,
                Err(err) => Some((Err(err), machine)),
            }
        }))
    }

    fn fail<T>(&mut self, err: Error) -> Result<Option<T>> {
        self.state = MachineState::Done;
        self.pending.clear();
        Err(err)
    }

    async fn decide(&mut self) -> Result<()> {
        let query_id = self
            .query_id
            .clone()
            .ok_or_else(|| Error::Protocol("no query id in DECIDE".to_string()))?;
        let (chunk_count, finished) = match self.tracker.latest() {
            Some(status) => (status.chunk_count, status.execution_finished()),
            None => (0, false),
        };
        if self.emitted_chunks < chunk_count {
            let limit = chunk_count - self.emitted_chunks;
            let omit_schema = self.schema_delivered;
            self.schema_delivered = true;
            let deadline = self.executor.call_deadline();
            debug!(
                "fetching chunks [{}, {}) of {}",
                self.emitted_chunks, chunk_count, query_id
            );
            let stream = self
                .executor
                .get_chunk_range(&query_id, self.emitted_chunks, limit, omit_schema, &deadline)
                .await?;
            self.state = MachineState::FetchKnown {
                stream,
                deadline,
                requested: limit,
            };
        } else if finished {
            self.state = MachineState::Done;
        } else {
            let deadline = self.executor.call_deadline();
            debug!("polling status of {}", query_id);
            let stream = self.executor.get_query_info(&query_id, &deadline).await?;
            self.state = MachineState::PollStatus { stream, deadline };
        }
        Ok(())
    }

    fn absorb_execute_response(&mut self, response: grpc::ExecuteQueryResponse) -> Result<()> {
        match response.response {
            Some(grpc::execute_query_response::Response::QueryInfo(info)) => {
                self.absorb_query_info(info)
            }
            Some(grpc::execute_query_response::Response::QueryResult(result)) => {
                self.absorb_query_result(result, true)
            }
            None => Ok(()),
        }
    }

    fn absorb_query_info(&mut self, info: grpc::QueryInfo) -> Result<()> {
        match info.content {
            Some(grpc::query_info::Content::QueryStatus(status)) => {
                self.tracker.observe(status)?;
                if self.query_id.is_none() {
                    if let Some(latest) = self.tracker.latest() {
                        if !latest.query_id.is_empty() {
                            self.query_id = Some(latest.query_id.clone());
                        }
                    }
                }
                Ok(())
            }
            Some(grpc::query_info::Content::BinarySchema(part)) => {
                self.schema_delivered = true;
                self.pending.push_back(part.data);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn absorb_query_result(&mut self, result: grpc::QueryResult, inline: bool) -> Result<()> {
        match result.result {
            Some(grpc::query_result::Result::QueryInfo(info)) => self.absorb_query_info(info),
            Some(grpc::query_result::Result::BinaryPart(part)) => {
                // Each non-empty inline part is one chunk the fetch phase
                // must not re-request; zero-byte frames carry no chunk.
                if inline && !part.data.is_empty() {
                    self.emitted_chunks += 1;
                }
                self.schema_delivered = true;
                self.pending.push_back(part.data);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PayloadStream for AdaptiveQueryStream {
    async fn next_payload(&mut self) -> Result<Option<Bytes>> {
        self.next().await
    }
}
