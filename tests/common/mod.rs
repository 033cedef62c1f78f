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

//! Scripted in-process Hyper service used by the integration tests: each test
//! starts its own server on a loopback port with a tailored script.

#![allow(dead_code)]

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::Stream;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use hyperdb_client::grpc;
use hyperdb_client::grpc::hyper_service_server::{HyperService, HyperServiceServer};
use hyperdb_client::{Client, PayloadStream};

pub const QUERY_ID: &str = "q-1";

/// Behavior of the scripted query served by [`FakeHyper`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedQuery {
    /// Schema bytes; emitted when non-empty.
    pub schema: Vec<u8>,
    /// One payload frame per chunk.
    pub chunks: Vec<Vec<u8>>,
    /// Rows per chunk, for row addressing.
    pub rows_per_chunk: u64,
    /// How many chunks ride the execute stream in adaptive mode.
    pub inline_chunks: usize,
    /// Status emitted first on the execute stream; defaults to the live one.
    pub inline_status: Option<grpc::QueryStatus>,
    /// Keep reporting RUNNING until this much time passed since execute.
    pub run_for: Option<Duration>,
    /// Once `run_for` elapsed, report this `(sqlstate, message)` error.
    pub fail_after_run: Option<(String, String)>,
    /// Insert a zero-length frame between inline chunk frames.
    pub insert_empty_frame: bool,
}

/// What one `GetQueryResult` call asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeKind {
    Rows { offset: u64, row_limit: u64 },
    Chunks { chunk_id: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCall {
    pub omit_schema: bool,
    pub range: RangeKind,
}

/// Observable server-side state, shared with the test body.
pub struct ServerState {
    created: Instant,
    started: Mutex<Option<Instant>>,
    canceled: AtomicBool,
    pub cancel_calls: AtomicUsize,
    pub info_calls: AtomicUsize,
    pub result_calls: Mutex<Vec<ResultCall>>,
    pub execute_metadata: Mutex<Option<HashMap<String, String>>>,
    pub execute_settings: Mutex<Option<HashMap<String, String>>>,
}

impl ServerState {
    fn new() -> Self {
        ServerState {
            created: Instant::now(),
            started: Mutex::new(None),
            canceled: AtomicBool::new(false),
            cancel_calls: AtomicUsize::new(0),
            info_calls: AtomicUsize::new(0),
            result_calls: Mutex::new(Vec::new()),
            execute_metadata: Mutex::new(None),
            execute_settings: Mutex::new(None),
        }
    }

    pub fn recorded_result_calls(&self) -> Vec<ResultCall> {
        self.result_calls.lock().unwrap().clone()
    }

    pub fn recorded_metadata(&self) -> HashMap<String, String> {
        self.execute_metadata
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default()
    }

    pub fn recorded_settings(&self) -> HashMap<String, String> {
        self.execute_settings
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default()
    }
}

pub struct FakeHyper {
    script: ScriptedQuery,
    state: Arc<ServerState>,
}

type MessageStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send + 'static>>;

impl FakeHyper {
    fn status_now(&self) -> grpc::QueryStatus {
        let total_chunks = self.script.chunks.len() as u64;
        let total_rows = total_chunks * self.script.rows_per_chunk;
        let mut status = grpc::QueryStatus {
            query_id: QUERY_ID.to_string(),
            completion_status: grpc::CompletionStatus::RunningOrUnspecified as i32,
            chunk_count: 0,
            row_count: 0,
            progress: 0.0,
            error: None,
        };
        if self.state.canceled.load(Ordering::SeqCst) {
            status.error = Some(grpc::ErrorInfo {
                sqlstate: "57014".to_string(),
                primary_message: "canceled by user".to_string(),
                hint: String::new(),
                detail: String::new(),
            });
            return status;
        }
        let started = self
            .state
            .started
            .lock()
            .unwrap()
            .unwrap_or(self.state.created);
        let still_running = self
            .script
            .run_for
            .map(|d| started.elapsed() < d)
            .unwrap_or(false);
        if still_running {
            status.progress = 0.1;
            return status;
        }
        if let Some((sqlstate, message)) = &self.script.fail_after_run {
            status.error = Some(grpc::ErrorInfo {
                sqlstate: sqlstate.clone(),
                primary_message: message.clone(),
                hint: String::new(),
                detail: String::new(),
            });
            return status;
        }
        status.completion_status = grpc::CompletionStatus::Finished as i32;
        status.chunk_count = total_chunks;
        status.row_count = total_rows;
        status.progress = 1.0;
        status
    }

    fn chunk_part(&self, index: usize) -> grpc::QueryResult {
        grpc::QueryResult {
            result: Some(grpc::query_result::Result::BinaryPart(grpc::BinaryPart {
                data: self.script.chunks[index].clone().into(),
            })),
        }
    }

    fn schema_result(&self) -> grpc::QueryResult {
        grpc::QueryResult {
            result: Some(grpc::query_result::Result::BinaryPart(grpc::BinaryPart {
                data: self.script.schema.clone().into(),
            })),
        }
    }
}

#[tonic::async_trait]
impl HyperService for FakeHyper {
    type ExecuteQueryStream = MessageStream<grpc::ExecuteQueryResponse>;
    type GetQueryInfoStream = MessageStream<grpc::QueryInfo>;
    type GetQueryResultStream = MessageStream<grpc::QueryResult>;

    async fn execute_query(
        &self,
        request: Request<grpc::QueryParam>,
    ) -> Result<Response<Self::ExecuteQueryStream>, Status> {
        let metadata = request
            .metadata()
            .iter()
            .filter_map(|entry| match entry {
                tonic::metadata::KeyAndValueRef::Ascii(key, value) => Some((
                    key.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )),
                tonic::metadata::KeyAndValueRef::Binary(_, _) => None,
            })
            .collect::<HashMap<_, _>>();
        *self.state.execute_metadata.lock().unwrap() = Some(metadata);
        let param = request.into_inner();
        *self.state.execute_settings.lock().unwrap() = Some(param.settings.clone());
        *self.state.started.lock().unwrap() = Some(Instant::now());

        let status = self
            .script
            .inline_status
            .clone()
            .unwrap_or_else(|| self.status_now());
        let mut responses = vec![Ok(grpc::ExecuteQueryResponse {
            response: Some(grpc::execute_query_response::Response::QueryInfo(
                grpc::QueryInfo {
                    content: Some(grpc::query_info::Content::QueryStatus(status)),
                },
            )),
        })];
        if param.transfer_mode() != grpc::TransferMode::Async {
            if self.script.inline_chunks > 0 && !self.script.schema.is_empty() {
                responses.push(Ok(grpc::ExecuteQueryResponse {
                    response: Some(grpc::execute_query_response::Response::QueryInfo(
                        grpc::QueryInfo {
                            content: Some(grpc::query_info::Content::BinarySchema(
                                grpc::BinaryPart {
                                    data: self.script.schema.clone().into(),
                                },
                            )),
                        },
                    )),
                }));
            }
            for index in 0..self.script.inline_chunks.min(self.script.chunks.len()) {
                if self.script.insert_empty_frame && index > 0 {
                    responses.push(Ok(grpc::ExecuteQueryResponse {
                        response: Some(
                            grpc::execute_query_response::Response::QueryResult(
                                grpc::QueryResult {
                                    result: Some(grpc::query_result::Result::BinaryPart(
                                        grpc::BinaryPart {
                                            data: Vec::new().into(),
                                        },
                                    )),
                                },
                            ),
                        ),
                    }));
                }
                responses.push(Ok(grpc::ExecuteQueryResponse {
                    response: Some(grpc::execute_query_response::Response::QueryResult(
                        self.chunk_part(index),
                    )),
                }));
            }
        }
        Ok(Response::new(Box::pin(futures::stream::iter(responses))))
    }

    async fn get_query_info(
        &self,
        request: Request<grpc::QueryInfoParam>,
    ) -> Result<Response<Self::GetQueryInfoStream>, Status> {
        self.state.info_calls.fetch_add(1, Ordering::SeqCst);
        if request.into_inner().query_id != QUERY_ID {
            return Err(Status::not_found("unknown query"));
        }
        let info = grpc::QueryInfo {
            content: Some(grpc::query_info::Content::QueryStatus(self.status_now())),
        };
        // One status, then the stream ends; clients re-subscribe.
        Ok(Response::new(Box::pin(futures::stream::iter(vec![Ok(info)]))))
    }

    async fn get_query_result(
        &self,
        request: Request<grpc::QueryResultParam>,
    ) -> Result<Response<Self::GetQueryResultStream>, Status> {
        let param = request.into_inner();
        if param.query_id != QUERY_ID {
            return Err(Status::not_found("unknown query"));
        }
        let total_chunks = self.script.chunks.len() as u64;
        let (first, last) = match param.range {
            Some(grpc::query_result_param::Range::ChunkRange(range)) => {
                self.state.result_calls.lock().unwrap().push(ResultCall {
                    omit_schema: param.omit_schema,
                    range: RangeKind::Chunks {
                        chunk_id: range.chunk_id,
                        limit: range.limit,
                    },
                });
                if range.chunk_id + range.limit > total_chunks {
                    return Err(Status::out_of_range(
                        "chunk range beyond produced chunks",
                    ));
                }
                (range.chunk_id, range.chunk_id + range.limit)
            }
            Some(grpc::query_result_param::Range::RowRange(range)) => {
                self.state.result_calls.lock().unwrap().push(ResultCall {
                    omit_schema: param.omit_schema,
                    range: RangeKind::Rows {
                        offset: range.offset,
                        row_limit: range.row_limit,
                    },
                });
                let rows_per_chunk = self.script.rows_per_chunk.max(1);
                let total_rows = total_chunks * rows_per_chunk;
                if range.offset + range.row_limit > total_rows {
                    return Err(Status::out_of_range("row range beyond produced rows"));
                }
                let first = range.offset / rows_per_chunk;
                let last = (range.offset + range.row_limit).div_ceil(rows_per_chunk);
                (first, last)
            }
            None => return Err(Status::invalid_argument("missing range")),
        };
        let mut responses = Vec::new();
        if !param.omit_schema && !self.script.schema.is_empty() {
            responses.push(Ok(self.schema_result()));
        }
        for index in first..last {
            responses.push(Ok(self.chunk_part(index as usize)));
        }
        Ok(Response::new(Box::pin(futures::stream::iter(responses))))
    }

    async fn cancel_query(
        &self,
        request: Request<grpc::CancelParam>,
    ) -> Result<Response<grpc::CancelQueryResponse>, Status> {
        self.state.cancel_calls.fetch_add(1, Ordering::SeqCst);
        if request.into_inner().query_id != QUERY_ID {
            return Err(Status::not_found("unknown query"));
        }
        self.state.canceled.store(true, Ordering::SeqCst);
        Ok(Response::new(grpc::CancelQueryResponse {}))
    }
}

/// A running scripted server plus its observable state.
pub struct TestServer {
    pub url: String,
    pub state: Arc<ServerState>,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Starts a scripted server on a loopback port.
pub async fn start_server(script: ScriptedQuery) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(ServerState::new());
    let service = FakeHyper {
        script,
        state: Arc::clone(&state),
    };
    let (shutdown, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(HyperServiceServer::new(service))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });
    TestServer {
        url: format!("http://{}", addr),
        state,
        shutdown: Some(shutdown),
    }
}

/// Connects a client to `server` with plaintext transport plus any extra
/// properties.
pub async fn connect(server: &TestServer, extra: &[(&str, &str)]) -> Client {
    let mut properties: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    properties.insert("ssl.disabled".to_string(), "true".to_string());
    Client::connect(&server.url, properties).await.unwrap()
}

/// Drains a payload stream into one frame list.
pub async fn collect_frames<S: PayloadStream>(source: &mut S) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    while let Some(frame) = source.next_payload().await.unwrap() {
        frames.push(frame.to_vec());
    }
    frames
}

/// A finished query with the given chunks, schema `SCHEMA` and one row per
/// chunk.
pub fn finished_query(chunks: &[&[u8]]) -> ScriptedQuery {
    ScriptedQuery {
        schema: b"SCHEMA".to_vec(),
        chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        rows_per_chunk: 1,
        ..ScriptedQuery::default()
    }
}
