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

//! Per-call request decoration.
//!
//! Metadata attachment is a list of function objects mutating the request
//! metadata; composition is list concatenation. Credential providers hook in
//! through the same seam, see
//! [`ChannelStubProvider::push_layer`](crate::transport::ChannelStubProvider::push_layer).

use std::sync::Arc;
use std::time::Duration;

use tonic::metadata::{Ascii, MetadataKey, MetadataMap, MetadataValue};
use tonic::Status;

use crate::errors::{Error, Result};
use crate::properties::ConnectionProperties;
use crate::transport::USER_AGENT;

/// One metadata-mutating layer of a [`CallInterceptor`].
pub type MetadataFn =
    Arc<dyn Fn(&mut MetadataMap) -> std::result::Result<(), Status> + Send + Sync>;

/// Interceptor applied to every outgoing call: runs the metadata layers in
/// order, then attaches the per-call timeout.
#[derive(Clone, Default)]
pub struct CallInterceptor {
    layers: Vec<MetadataFn>,
    timeout: Option<Duration>,
}

impl CallInterceptor {
    /// An interceptor with no layers and no timeout.
    pub fn new() -> Self {
        CallInterceptor::default()
    }

    /// Appends a metadata layer.
    pub fn push(&mut self, layer: MetadataFn) {
        self.layers.push(layer);
    }

    /// A copy of this interceptor carrying the given per-call timeout.
    pub fn with_timeout(&self, timeout: Option<Duration>) -> Self {
        CallInterceptor {
            layers: self.layers.clone(),
            timeout,
        }
    }
}

impl std::fmt::Debug for CallInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallInterceptor")
            .field("layers", &self.layers.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl tonic::service::Interceptor for CallInterceptor {
    fn call(
        &mut self,
        mut request: tonic::Request<()>,
    ) -> std::result::Result<tonic::Request<()>, Status> {
        for layer in &self.layers {
            layer(request.metadata_mut())?;
        }
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        Ok(request)
    }
}

/// Builds the connection-identity layer from [`ConnectionProperties`]: the
/// driver `user-agent`, the workload tag and the optional routing headers.
/// Header names and values are validated here, once, so the per-call path is
/// infallible.
pub fn connection_metadata(props: &ConnectionProperties) -> Result<MetadataFn> {
    let mut pairs: Vec<(MetadataKey<Ascii>, MetadataValue<Ascii>)> =
        vec![(ascii_key("user-agent")?, ascii_value("user-agent", USER_AGENT)?)];
    for (name, value) in props.metadata_pairs() {
        pairs.push((ascii_key(&name)?, ascii_value(&name, &value)?));
    }
    Ok(Arc::new(move |metadata: &mut MetadataMap| {
        for (key, value) in &pairs {
            metadata.insert(key.clone(), value.clone());
        }
        Ok(())
    }))
}

fn ascii_key(name: &str) -> Result<MetadataKey<Ascii>> {
    MetadataKey::from_bytes(name.as_bytes())
        .map_err(|_| Error::Config(format!("invalid header name {:?}", name)))
}

fn ascii_value(name: &str, value: &str) -> Result<MetadataValue<Ascii>> {
    MetadataValue::try_from(value)
        .map_err(|_| Error::Config(format!("invalid value for header {:?}", name)))
}
