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

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::Result;
use crate::executor::QueryExecutor;
use crate::parameters::QueryParameter;
use crate::properties::{
    ChannelProperties, ConnectionProperties, PropertyBag, StatementProperties,
};
use crate::query::{
    current_status, wait_for, AdaptiveQueryStream, AsyncQueryHandle, ChunkRangeReader,
    QueryStatus, RowRangeReader,
};
use crate::transport::{
    CallSettings, ChannelStubProvider, HyperTransport, StubProvider,
};

/// A connection to one Hyper endpoint.
///
/// The client is cheap to share behind an [`Arc`]; queries created from it
/// are independent and may run in parallel on the shared transport. Each
/// query iterator is single-consumer.
///
/// # Examples
///
/// ```no_run
/// use hyperdb_client::Client;
/// use std::collections::HashMap;
///
/// # async fn run() -> hyperdb_client::Result<()> {
/// let mut properties = HashMap::new();
/// properties.insert("workload".to_string(), "reporting".to_string());
/// let client = Client::connect("https://hyper.example.com:7483", properties).await?;
///
/// let statement = client.statement();
/// let mut rows = client.execute_query(&statement, "SELECT 1", &[]).await?;
/// while let Some(frame) = rows.next().await? {
///     // feed `frame` to the record-batch decoder
///     let _ = frame;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client {
    provider: Arc<dyn StubProvider>,
    connection: ConnectionProperties,
    retry: Option<CallSettings>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Opens an owned transport to `url` and builds a client from a flat
    /// property bag. Unknown keys are rejected with their names.
    pub async fn connect(url: &str, properties: HashMap<String, String>) -> Result<Self> {
        let mut bag = PropertyBag::new(properties);
        let channel = ChannelProperties::parse(&mut bag)?;
        let connection = ConnectionProperties::parse(&mut bag)?;
        bag.reject_residual()?;
        let transport = HyperTransport::connect(url, &channel).await?;
        let provider = ChannelStubProvider::new(transport, &connection)?;
        Ok(Client {
            provider: Arc::new(provider),
            retry: channel.retry.as_ref().map(CallSettings::from),
            connection,
        })
    }

    /// Builds a client over a caller-provided stub provider, typically to
    /// share one channel across several connections. The transport stays
    /// with its owner when this client is closed.
    pub fn with_stub_provider(
        provider: Arc<dyn StubProvider>,
        connection: ConnectionProperties,
        channel: &ChannelProperties,
    ) -> Self {
        Client {
            provider,
            retry: channel.retry.as_ref().map(CallSettings::from),
            connection,
        }
    }

    /// The connection's identity and routing properties.
    pub fn connection_properties(&self) -> &ConnectionProperties {
        &self.connection
    }

    /// A fresh statement carrying this connection's defaults. Adjust it with
    /// its setters, then pass it to the execute and range calls.
    pub fn statement(&self) -> StatementProperties {
        self.connection.statement.clone()
    }

    fn executor(&self, statement: &StatementProperties) -> Arc<QueryExecutor> {
        Arc::new(QueryExecutor::new(
            Arc::clone(&self.provider),
            &self.connection,
            statement.clone(),
            self.retry.clone(),
        ))
    }

    /// Executes `sql` adaptively and returns the frame iterator. Feed it to
    /// [`ResultByteChannel`](crate::ResultByteChannel) for the record-batch
    /// decoder.
    pub async fn execute_query(
        &self,
        statement: &StatementProperties,
        sql: &str,
        parameters: &[QueryParameter],
    ) -> Result<AdaptiveQueryStream> {
        AdaptiveQueryStream::execute(self.executor(statement), sql, parameters).await
    }

    /// Submits `sql` asynchronously and returns once the server assigned a
    /// query id; pair with [`Self::wait_for`] and the range readers.
    pub async fn execute_query_async(
        &self,
        statement: &StatementProperties,
        sql: &str,
        parameters: &[QueryParameter],
    ) -> Result<AsyncQueryHandle> {
        AsyncQueryHandle::submit(&self.executor(statement), sql, parameters).await
    }

    /// Waits until `predicate` accepts the latest status of `query_id`, see
    /// [`wait_for`](crate::query::wait_for) for the termination cases.
    pub async fn wait_for<P>(
        &self,
        query_id: &str,
        timeout: Option<Duration>,
        predicate: P,
    ) -> Result<QueryStatus>
    where
        P: FnMut(&QueryStatus) -> bool,
    {
        let statement = self.statement();
        wait_for(&self.executor(&statement), query_id, timeout, predicate).await
    }

    /// The current status of `query_id`.
    pub async fn query_status(&self, query_id: &str) -> Result<QueryStatus> {
        let statement = self.statement();
        current_status(&self.executor(&statement), query_id).await
    }

    /// Opens a reader over rows `[offset, offset + limit)`; the results must
    /// have been produced, see [`RowRangeReader`].
    pub async fn get_row_range(
        &self,
        statement: &StatementProperties,
        query_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<RowRangeReader> {
        RowRangeReader::open(self.executor(statement), query_id, offset, limit).await
    }

    /// Opens a reader over chunks `[chunk_id, chunk_id + limit)`; `limit`
    /// defaults to one chunk.
    pub async fn get_chunk_range(
        &self,
        query_id: &str,
        chunk_id: u64,
        limit: Option<u64>,
    ) -> Result<ChunkRangeReader> {
        let statement = self.statement();
        ChunkRangeReader::open(
            self.executor(&statement),
            query_id,
            chunk_id,
            limit.unwrap_or(1),
        )
        .await
    }

    /// Cancels `query_id`, best-effort: idempotent, unknown ids succeed
    /// silently, the transport stays up.
    pub async fn cancel_query(&self, query_id: &str) -> Result<()> {
        let statement = self.statement();
        self.executor(&statement).cancel_query(query_id).await
    }
}
