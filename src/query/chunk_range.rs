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

/// Random-access reader over chunks `[chunk_id, chunk_id + limit)` of a
/// query whose results are produced.
///
/// The whole range rides one server-streaming call; the server paces
/// delivery. The first message carries the schema bytes.
pub struct ChunkRangeReader {
    executor: Arc<QueryExecutor>,
    query_id: String,
    chunk_id: u64,
    limit: u64,
    known_chunks: u64,
    active: Option<(Streaming<grpc::QueryResult>, Deadline)>,
    done: bool,
}

impl std::fmt::Debug for ChunkRangeReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkRangeReader")
            .field("query_id", &self.query_id)
            .field("chunk_id", &self.chunk_id)
            .field("limit", &self.limit)
            .field("known_chunks", &self.known_chunks)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl ChunkRangeReader {
    /// Opens the range, failing fast with
    /// [`Error::ChunkRangeUnavailable`] when the server does not advertise
    /// enough chunks yet. `limit` defaults to 1 when unspecified at the
    /// client surface.
    pub(crate) async fn open(
        executor: Arc<QueryExecutor>,
        query_id: &str,
        chunk_id: u64,
        limit: u64,
    ) -> Result<Self> {
        // Same covering rule as the row reader: the advertised chunk count
        // is monotonic, so it alone decides whether the range exists.
        let status = current_status(&executor, query_id).await?;
        if status.chunk_count < chunk_id + limit {
            return Err(Error::ChunkRangeUnavailable {
                chunk_id,
                limit,
                chunk_count: status.chunk_count,
            });
        }
        Ok(ChunkRangeReader {
            executor,
            query_id: query_id.to_string(),
            chunk_id,
            limit,
            known_chunks: status.chunk_count,
            active: None,
            done: false,
        })
    }

    /// The query this reader is bound to.
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    fn map_range_error(&self, err: Error) -> Error {
        match err {
            Error::Rpc(status) if status.code() == tonic::Code::OutOfRange => {
                Error::ChunkRangeUnavailable {
                    chunk_id: self.chunk_id,
                    limit: self.limit,
                    chunk_count: self.known_chunks,
                }
            }
            other => other,
        }
    }
}

#[async_trait::async_trait]
impl PayloadStream for ChunkRangeReader {
    async fn next_payload(&mut self) -> Result<Option<Bytes>> {
        loop {
            if self.done {
                return Ok(None);
            }
            if let Some((stream, deadline)) = &mut self.active {
                let deadline = *deadline;
                match next_message(stream, &deadline).await {
                    Ok(Some(result)) => match result.result {
                        Some(grpc::query_result::Result::BinaryPart(part)) => {
                            return Ok(Some(part.data));
                        }
                        // Status carriers inside a result stream are skipped.
                        Some(grpc::query_result::Result::QueryInfo(_)) | None => continue,
                    },
                    Ok(None) => {
                        self.active = None;
                        self.done = true;
                    }
                    Err(err) => return Err(self.map_range_error(err)),
                }
                continue;
            }
            let deadline = self.executor.call_deadline();
            debug!(
                "fetching chunks [{}, {}) of {}",
                self.chunk_id,
                self.chunk_id + self.limit,
                self.query_id
            );
            let stream = self
                .executor
                .get_chunk_range(&self.query_id, self.chunk_id, self.limit, false, &deadline)
                .await
                .map_err(|err| self.map_range_error(err))?;
            self.active = Some((stream, deadline));
        }
    }
}
