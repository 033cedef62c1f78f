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

//! Channel construction and ownership.

mod interceptor;
mod retry;
mod stub;

pub use self::interceptor::{connection_metadata, CallInterceptor, MetadataFn};
pub use self::retry::{invoke, Backoff, CallSettings};
pub use self::stub::{ChannelStubProvider, HyperStub, StubProvider};

use log::debug;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};

use crate::errors::{Error, Result};
use crate::properties::{ChannelProperties, SslMode};

/// Driver identifier sent as the `user-agent` of every call.
pub(crate) const USER_AGENT: &str =
    concat!("hyperdb-client-rust/", env!("CARGO_PKG_VERSION"));

/// Who tears the channel down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOwnership {
    /// The transport was opened by this client and disconnects when the last
    /// handle is dropped.
    Owned,
    /// The channel belongs to the caller; closing the client leaves it up.
    Borrowed,
}

/// A gRPC channel plus its ownership mode.
///
/// [`Channel`] handles are reference-counted; a borrowed transport holds one
/// more handle to the caller's channel, so dropping it never disturbs the
/// caller.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    channel: Channel,
    ownership: ChannelOwnership,
}

impl HyperTransport {
    /// Opens an owned transport to `url` ("http://host:port" or
    /// "https://host:port") configured from `props`.
    pub async fn connect(url: &str, props: &ChannelProperties) -> Result<Self> {
        let mut endpoint = Endpoint::from_shared(url.to_string())
            .map_err(|e| Error::Config(format!("invalid endpoint url {:?}: {}", url, e)))?
            .user_agent(USER_AGENT)
            .map_err(|e| Error::Config(format!("invalid user agent: {}", e)))?;
        if let Some(keep_alive) = &props.keep_alive {
            endpoint = endpoint
                .http2_keep_alive_interval(keep_alive.time)
                .keep_alive_timeout(keep_alive.timeout)
                .keep_alive_while_idle(keep_alive.without_calls);
        }
        if let Some(tls) = tls_config(&props.ssl)? {
            endpoint = endpoint.tls_config(tls)?;
        }
        debug!("connecting to {}", url);
        let channel = endpoint.connect().await?;
        Ok(HyperTransport {
            channel,
            ownership: ChannelOwnership::Owned,
        })
    }

    /// Wraps a caller-owned channel; closing this transport is a no-op for
    /// the underlying connection.
    pub fn from_channel(channel: Channel) -> Self {
        HyperTransport {
            channel,
            ownership: ChannelOwnership::Borrowed,
        }
    }

    /// A fresh handle to the underlying channel.
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    /// Ownership mode of the underlying channel.
    pub fn ownership(&self) -> ChannelOwnership {
        self.ownership
    }

    /// Releases this transport's handle. An owned channel disconnects once
    /// every stub created from it is gone; a borrowed channel stays up for
    /// its owner.
    pub fn close(self) {
        debug!("closing {:?} transport", self.ownership);
    }
}

fn tls_config(ssl: &SslMode) -> Result<Option<ClientTlsConfig>> {
    let config = match ssl {
        SslMode::Disabled => None,
        SslMode::SystemTrust => Some(ClientTlsConfig::new().with_native_roots()),
        SslMode::CustomTrust { ca_path } => {
            Some(ClientTlsConfig::new().ca_certificate(read_certificate(ca_path)?))
        }
        SslMode::MutualTls {
            cert_path,
            key_path,
            ca_path,
        } => {
            let cert = read_pem(cert_path)?;
            let key = read_pem(key_path)?;
            let mut config =
                ClientTlsConfig::new().identity(Identity::from_pem(cert, key));
            config = match ca_path {
                Some(ca_path) => config.ca_certificate(read_certificate(ca_path)?),
                None => config.with_native_roots(),
            };
            Some(config)
        }
    };
    Ok(config)
}

fn read_certificate(path: &std::path::Path) -> Result<Certificate> {
    Ok(Certificate::from_pem(read_pem(path)?))
}

fn read_pem(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        Error::Config(format!("cannot read TLS material {}: {}", path.display(), e))
    })
}
