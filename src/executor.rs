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

//! Thin typed layer over the service stub: the four query RPCs with per-call
//! deadlines, request shaping and error translation.
//!
//! This layer never retries on its own; retryable call initiations go through
//! the transport's [`invoke`](crate::transport::invoke) with the channel's
//! policy. `get_query_info`, `get_query_result` and `cancel` are idempotent
//! and always eligible; `execute` is only retried at initiation, before any
//! response (and therefore any query id) exists.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use tonic::Streaming;

use crate::errors::{Error, Result};
use crate::grpc;
use crate::parameters::QueryParameter;
use crate::properties::{ConnectionProperties, StatementProperties};
use crate::query::TransferMode;
use crate::transport::{invoke, CallSettings, StubProvider};

/// An absolute per-call deadline; `None` inside means infinite.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires.
    pub fn infinite() -> Self {
        Deadline(None)
    }

    /// A deadline `timeout` from now; `None` gives an infinite deadline.
    pub fn after(timeout: Option<Duration>) -> Self {
        Deadline(timeout.map(|t| Instant::now() + t))
    }

    /// The earlier of the two deadlines.
    pub fn min(self, other: Deadline) -> Deadline {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Deadline(Some(a.min(b))),
            (a, b) => Deadline(a.or(b)),
        }
    }

    /// Time left, `None` when infinite, zero when already past.
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has already passed.
    pub fn expired(&self) -> bool {
        matches!(self.remaining(), Some(d) if d.is_zero())
    }

    /// The per-call timeout to announce to the server.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.remaining()
    }

    /// Runs `fut` bounded by this deadline.
    pub(crate) async fn run<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: std::future::Future<Output = std::result::Result<T, tonic::Status>>,
    {
        match self.remaining() {
            None => fut.await.map_err(Error::from),
            Some(left) => match tokio::time::timeout(left, fut).await {
                Ok(result) => result.map_err(Error::from),
                Err(_) => Err(Error::DeadlineExceeded(format!(
                    "{} exceeded the call deadline",
                    what
                ))),
            },
        }
    }
}

/// Pulls the next message off `stream`, bounded by `deadline`.
pub(crate) async fn next_message<T>(
    stream: &mut Streaming<T>,
    deadline: &Deadline,
) -> Result<Option<T>> {
    deadline.run("receiving a message", stream.message()).await
}

/// The four query operations, bound to one statement's timeouts.
pub struct QueryExecutor {
    provider: Arc<dyn StubProvider>,
    statement: StatementProperties,
    network_timeout: Option<Duration>,
    retry: Option<CallSettings>,
}

impl QueryExecutor {
    /// Binds an executor to a stub provider and a statement's properties.
    pub fn new(
        provider: Arc<dyn StubProvider>,
        connection: &ConnectionProperties,
        statement: StatementProperties,
        retry: Option<CallSettings>,
    ) -> Self {
        QueryExecutor {
            provider,
            statement,
            network_timeout: connection.network_timeout_opt(),
            retry,
        }
    }

    /// The statement this executor serves.
    pub fn statement(&self) -> &StatementProperties {
        &self.statement
    }

    /// Effective per-call timeout: the tighter of the statement's enforced
    /// timeout (`query_timeout + grace`) and the connection's network safety
    /// net. `None` means calls are unbounded.
    pub fn call_timeout(&self) -> Option<Duration> {
        match (self.statement.enforced_timeout(), self.network_timeout) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// A fresh absolute deadline for one call.
    pub fn call_deadline(&self) -> Deadline {
        Deadline::after(self.call_timeout())
    }

    fn stub_for(&self, deadline: &Deadline) -> crate::transport::HyperStub {
        self.provider.stub(deadline.call_timeout())
    }

    /// Submits a query. At most one `execute` happens per query; the
    /// returned stream multiplexes status updates with the inline result
    /// prefix.
    pub async fn execute_query(
        &self,
        sql: &str,
        parameters: &[QueryParameter],
        mode: TransferMode,
    ) -> Result<(Streaming<grpc::ExecuteQueryResponse>, Deadline)> {
        self.statement.validate()?;
        let param = grpc::QueryParam {
            query: sql.to_string(),
            param_style: QueryParameter::style_of(parameters) as i32,
            parameters: parameters.iter().map(QueryParameter::to_wire).collect(),
            transfer_mode: mode.to_wire() as i32,
            output_format: grpc::OutputFormat::ArrowIpc as i32,
            settings: self.statement.server_query_settings(),
            max_rows: self.statement.target_max_rows(),
            max_bytes: self.statement.target_max_bytes(),
        };
        let deadline = self.call_deadline();
        debug!("executing query in {:?} mode", mode);
        let response = deadline
            .run(
                "execute_query",
                invoke(self.retry.as_ref(), "execute_query", || {
                    let mut stub = self.stub_for(&deadline);
                    let param = param.clone();
                    async move { stub.execute_query(param).await }
                }),
            )
            .await?;
        Ok((response.into_inner(), deadline))
    }

    /// Subscribes to status updates for `query_id`. The server may end the
    /// stream while the query is still running; callers re-subscribe.
    pub async fn get_query_info(
        &self,
        query_id: &str,
        deadline: &Deadline,
    ) -> Result<Streaming<grpc::QueryInfo>> {
        let param = grpc::QueryInfoParam {
            query_id: query_id.to_string(),
        };
        let response = deadline
            .run(
                "get_query_info",
                invoke(self.retry.as_ref(), "get_query_info", || {
                    let mut stub = self.stub_for(deadline);
                    let param = param.clone();
                    async move { stub.get_query_info(param).await }
                }),
            )
            .await?;
        Ok(response.into_inner())
    }

    /// Fetches chunks `[chunk_id, chunk_id + limit)`.
    pub async fn get_chunk_range(
        &self,
        query_id: &str,
        chunk_id: u64,
        limit: u64,
        omit_schema: bool,
        deadline: &Deadline,
    ) -> Result<Streaming<grpc::QueryResult>> {
        let param = grpc::QueryResultParam {
            query_id: query_id.to_string(),
            omit_schema,
            range: Some(grpc::query_result_param::Range::ChunkRange(
                grpc::ChunkRange { chunk_id, limit },
            )),
        };
        self.get_query_result(param, deadline).await
    }

    /// Fetches rows `[offset, offset + row_limit)`, bounded by `byte_limit`
    /// when non-zero.
    pub async fn get_row_range(
        &self,
        query_id: &str,
        offset: u64,
        row_limit: u64,
        byte_limit: u64,
        omit_schema: bool,
        deadline: &Deadline,
    ) -> Result<Streaming<grpc::QueryResult>> {
        let param = grpc::QueryResultParam {
            query_id: query_id.to_string(),
            omit_schema,
            range: Some(grpc::query_result_param::Range::RowRange(grpc::RowRange {
                offset,
                row_limit,
                byte_limit,
            })),
        };
        self.get_query_result(param, deadline).await
    }

    async fn get_query_result(
        &self,
        param: grpc::QueryResultParam,
        deadline: &Deadline,
    ) -> Result<Streaming<grpc::QueryResult>> {
        let response = deadline
            .run(
                "get_query_result",
                invoke(self.retry.as_ref(), "get_query_result", || {
                    let mut stub = self.stub_for(deadline);
                    let param = param.clone();
                    async move { stub.get_query_result(param).await }
                }),
            )
            .await?;
        Ok(response.into_inner())
    }

    /// Best-effort cancellation: idempotent, and an unknown query id counts
    /// as success.
    pub async fn cancel_query(&self, query_id: &str) -> Result<()> {
        let param = grpc::CancelParam {
            query_id: query_id.to_string(),
        };
        let deadline = self.call_deadline();
        let result = deadline
            .run(
                "cancel_query",
                invoke(self.retry.as_ref(), "cancel_query", || {
                    let mut stub = self.stub_for(&deadline);
                    let param = param.clone();
                    async move { stub.cancel_query(param).await }
                }),
            )
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(Error::Rpc(status)) if status.code() == tonic::Code::NotFound => {
                debug!("cancel for unknown query {} ignored", query_id);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
