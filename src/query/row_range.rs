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

use bytes::Bytes;
use log::debug;
use tonic::Streaming;

use crate::errors::{Error, Result};
use crate::executor::{next_message, Deadline, QueryExecutor};
use crate::grpc;
use crate::query::byte_channel::PayloadStream;
use crate::query::waiter::current_status;

/// Random-access reader over rows `[offset, offset + limit)` of a query
/// whose results are produced.
///
/// Pages the range by the statement's `target_max_rows`/`target_max_bytes`
/// and emits frames in row order. The first page carries the schema bytes;
/// follow-up pages omit them, the schema decoded from the first page is
/// reused.
pub struct RowRangeReader {
    executor: Arc<QueryExecutor>,
    query_id: String,
    next_offset: u64,
    remaining: u64,
    page_rows: u64,
    page_bytes: u64,
    pages_issued: u64,
    known_rows: u64,
    active: Option<(Streaming<grpc::QueryResult>, Deadline, u64)>,
}

impl std::fmt::Debug for RowRangeReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowRangeReader")
            .field("query_id", &self.query_id)
            .field("next_offset", &self.next_offset)
            .field("remaining", &self.remaining)
            .field("page_rows", &self.page_rows)
            .field("page_bytes", &self.page_bytes)
            .field("pages_issued", &self.pages_issued)
            .field("known_rows", &self.known_rows)
            .finish_non_exhaustive()
    }
}

impl RowRangeReader {
    /// Opens the range, failing fast with
    /// [`Error::RowRangeUnavailable`] when the server does not report enough
    /// rows yet. Callers typically wait first with a predicate implying
    /// `all_results_produced || row_count >= offset + limit`.
    pub(crate) async fn open(
        executor: Arc<QueryExecutor>,
        query_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Self> {
        executor.statement().validate()?;
        // The advertised count is monotonic, so a range it covers exists for
        // good; a range it does not cover is either not produced yet (the
        // caller should have waited) or past the end of a finished result.
        let status = current_status(&executor, query_id).await?;
        if status.row_count < offset + limit {
            return Err(Error::RowRangeUnavailable {
                offset,
                limit,
                row_count: status.row_count,
            });
        }
        Ok(RowRangeReader {
            executor: Arc::clone(&executor),
            query_id: query_id.to_string(),
            next_offset: offset,
            remaining: limit,
            page_rows: executor.statement().target_max_rows(),
            page_bytes: executor.statement().target_max_bytes(),
            pages_issued: 0,
            known_rows: status.row_count,
            active: None,
        })
    }

    /// The query this reader is bound to.
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    fn map_range_error(&self, err: Error) -> Error {
        match err {
            Error::Rpc(status) if status.code() == tonic::Code::OutOfRange => {
                Error::RowRangeUnavailable {
                    offset: self.next_offset,
                    limit: self.remaining,
                    row_count: self.known_rows,
                }
            }
            other => other,
        }
    }
}

#[async_trait::async_trait]
impl PayloadStream for RowRangeReader {
    async fn next_payload(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some((stream, deadline, page)) = &mut self.active {
                let deadline = *deadline;
                let page = *page;
                match next_message(stream, &deadline).await {
                    Ok(Some(result)) => match result.result {
                        Some(grpc::query_result::Result::BinaryPart(part)) => {
                            return Ok(Some(part.data));
                        }
                        // Status carriers inside a result stream are skipped.
                        Some(grpc::query_result::Result::QueryInfo(_)) | None => continue,
                    },
                    Ok(None) => {
                        self.next_offset += page;
                        self.remaining -= page;
                        self.active = None;
                    }
                    Err(err) => return Err(self.map_range_error(err)),
                }
                continue;
            }
            if self.remaining == 0 {
                return Ok(None);
            }
            let rows = if self.page_rows > 0 {
                self.page_rows.min(self.remaining)
            } else {
                self.remaining
            };
            let omit_schema = self.pages_issued > 0;
            let deadline = self.executor.call_deadline();
            debug!(
                "fetching rows [{}, {}) of {}",
                self.next_offset,
                self.next_offset + rows,
                self.query_id
            );
            let stream = self
                .executor
                .get_row_range(
                    &self.query_id,
                    self.next_offset,
                    rows,
                    self.page_bytes,
                    omit_schema,
                    &deadline,
                )
                .await
                .map_err(|err| self.map_range_error(err))?;
            self.pages_issued += 1;
            self.active = Some((stream, deadline, rows));
        }
    }
}
