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

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

//! A pure-Rust client driver for the Hyper columnar analytics service.
//!
//! Queries run over a binary RPC protocol in which one submission may
//! produce an inline result prefix, a stream of status updates and a
//! chunk-addressable result store. This crate turns those three response
//! modes into single well-ordered byte streams for a record-batch decoder,
//! while honoring timeouts, cancellation, transport retries and server-paced
//! backpressure.
//!
//! The pieces, leaves first:
//!
//! - [`properties`]: typed configuration parsed destructively from a flat
//!   property bag.
//! - [`transport`]: channel construction, ownership, per-call interceptors
//!   and the retry ladder.
//! - [`QueryExecutor`]: the four query RPCs with per-call deadlines.
//! - [`query`]: the adaptive state machine, the async execution handle, the
//!   row/chunk range readers, the status waiter and the byte channel.
//! - [`Client`]: the connection surface tying it all together.
//!
//! # Examples
//!
//! ```no_run
//! use hyperdb_client::{Client, ResultByteChannel};
//! use std::collections::HashMap;
//!
//! # async fn run() -> hyperdb_client::Result<()> {
//! let client = Client::connect("https://hyper.example.com:7483", HashMap::new()).await?;
//!
//! // Adaptive execution: results stream as they are produced.
//! let statement = client.statement();
//! let rows = client.execute_query(&statement, "SELECT a, b FROM t", &[]).await?;
//! let mut channel = ResultByteChannel::new(rows);
//! let mut buf = vec![0u8; 64 * 1024];
//! while channel.read(&mut buf).await? > 0 {
//!     // hand the bytes to the Arrow IPC decoder
//! }
//!
//! // Async execution: submit, wait out of band, fetch by chunk.
//! let handle = client
//!     .execute_query_async(&statement, "SELECT * FROM big", &[])
//!     .await?;
//! let status = client
//!     .wait_for(handle.query_id(), None, |s| s.all_results_produced())
//!     .await?;
//! let chunks = client
//!     .get_chunk_range(handle.query_id(), 0, Some(status.chunk_count))
//!     .await?;
//! # let _ = chunks;
//! # Ok(())
//! # }
//! ```

pub use crate::client::Client;
pub use crate::errors::{Error, Result, ServerError};
pub use crate::executor::{Deadline, QueryExecutor};
pub use crate::parameters::QueryParameter;
pub use crate::properties::{
    ChannelProperties, ConnectionProperties, KeepAliveConfig, PropertyBag,
    RetryPolicyConfig, SslMode, StatementProperties, MAX_INBOUND_MESSAGE_BYTES,
    MAX_RESULT_BYTES, MIN_RESULT_BYTES,
};
pub use crate::query::{
    AdaptiveQueryStream, AsyncQueryHandle, ChunkRangeReader, CompletionStatus,
    PayloadStream, QueryStatus, ResultByteChannel, RowRangeReader, TransferMode,
};
pub use crate::transport::{
    Backoff, CallInterceptor, CallSettings, ChannelOwnership, ChannelStubProvider,
    HyperStub, HyperTransport, MetadataFn, StubProvider,
};

mod client;
pub mod errors;
mod executor;
pub mod grpc;
mod parameters;
pub mod properties;
pub mod query;
pub mod transport;
