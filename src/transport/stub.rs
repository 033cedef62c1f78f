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

use std::time::Duration;

use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;

use crate::errors::Result;
use crate::grpc::hyper_service_client::HyperServiceClient;
use crate::properties::{ConnectionProperties, MAX_INBOUND_MESSAGE_BYTES};
use crate::transport::interceptor::{connection_metadata, CallInterceptor, MetadataFn};
use crate::transport::{ChannelOwnership, HyperTransport};

/// A ready-to-call service handle with the connection's interceptors
/// composed in.
pub type HyperStub = HyperServiceClient<InterceptedService<Channel, CallInterceptor>>;

/// Factory for per-call service handles.
///
/// `stub` must be thread-safe: several queries on the same transport call it
/// concurrently, each getting its own interceptor-composed handle. The same
/// provider may back several connections when the caller shares a channel;
/// each connection then composes its own interceptors.
pub trait StubProvider: Send + Sync {
    /// A fresh handle carrying the connection metadata and the given per-call
    /// timeout.
    fn stub(&self, timeout: Option<Duration>) -> HyperStub;

    /// Ownership of the transport behind the handles.
    fn ownership(&self) -> ChannelOwnership;
}

/// Default [`StubProvider`] over a [`HyperTransport`].
pub struct ChannelStubProvider {
    transport: HyperTransport,
    base: CallInterceptor,
}

impl ChannelStubProvider {
    /// Builds a provider whose stubs carry the identity metadata of
    /// `connection`. Header validation happens here, once.
    pub fn new(transport: HyperTransport, connection: &ConnectionProperties) -> Result<Self> {
        let mut base = CallInterceptor::new();
        base.push(connection_metadata(connection)?);
        Ok(ChannelStubProvider { transport, base })
    }

    /// Appends a metadata layer applied after the connection identity. This
    /// is the seam for credential interceptors: a layer that attaches
    /// authorization metadata per call.
    pub fn push_layer(&mut self, layer: MetadataFn) {
        self.base.push(layer);
    }

    /// The transport backing this provider.
    pub fn transport(&self) -> &HyperTransport {
        &self.transport
    }

    /// Consumes the provider, releasing its transport handle.
    pub fn close(self) {
        self.transport.close();
    }
}

impl StubProvider for ChannelStubProvider {
    fn stub(&self, timeout: Option<Duration>) -> HyperStub {
        let interceptor = self.base.with_timeout(timeout);
        HyperServiceClient::with_interceptor(self.transport.channel(), interceptor)
            .max_decoding_message_size(MAX_INBOUND_MESSAGE_BYTES)
    }

    fn ownership(&self) -> ChannelOwnership {
        self.transport.ownership()
    }
}
