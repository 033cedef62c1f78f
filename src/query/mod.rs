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

//! The query-lifecycle engine: state machines and lazy readers turning the
//! server's three response modes into ordered byte streams.

mod adaptive;
mod byte_channel;
mod chunk_range;
mod handle;
mod row_range;
mod status;
mod waiter;

pub use self::adaptive::AdaptiveQueryStream;
pub use self::byte_channel::{PayloadStream, ResultByteChannel};
pub use self::chunk_range::ChunkRangeReader;
pub use self::handle::AsyncQueryHandle;
pub use self::row_range::RowRangeReader;
pub use self::status::{CompletionStatus, QueryStatus, StatusTracker};
pub use self::waiter::wait_for;

pub(crate) use self::waiter::current_status;

use crate::grpc;

/// How the server hands results back after `execute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// The whole result rides the first-call stream.
    Sync,
    /// The first call only acknowledges the query; results are fetched out
    /// of band.
    Async,
    /// The first call returns a short inline burst, the remainder is fetched
    /// on demand.
    #[default]
    Adaptive,
}

impl TransferMode {
    pub(crate) fn to_wire(self) -> grpc::TransferMode {
        match self {
            TransferMode::Sync => grpc::TransferMode::Sync,
            TransferMode::Async => grpc::TransferMode::Async,
            TransferMode::Adaptive => grpc::TransferMode::Adaptive,
        }
    }
}
