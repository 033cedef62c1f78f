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
use std::time::Duration;

use crate::errors::Result;
use crate::properties::{PropertyBag, StatementProperties};

const DEFAULT_WORKLOAD: &str = "jdbcv3";

/// Connection identity and routing, fixed once the connection is opened.
///
/// Every outgoing call carries metadata assembled from these fields, see
/// [`ConnectionProperties::metadata_pairs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProperties {
    /// Server-side routing and classification tag.
    pub workload: String,
    /// Opaque JSON context forwarded to the server when non-empty.
    pub external_client_context: Option<String>,
    /// Target dataspace, forwarded when non-empty.
    pub dataspace: Option<String>,
    /// Arbitrary extra outbound headers, passed verbatim.
    pub additional_headers: Vec<(String, String)>,
    /// Connection-wide per-call safety net; [`Duration::ZERO`] = infinite.
    pub network_timeout: Duration,
    /// Defaults inherited by statements created on this connection.
    pub statement: StatementProperties,
}

impl Default for ConnectionProperties {
    fn default() -> Self {
        ConnectionProperties {
            workload: DEFAULT_WORKLOAD.to_string(),
            external_client_context: None,
            dataspace: None,
            additional_headers: Vec::new(),
            network_timeout: Duration::ZERO,
            statement: StatementProperties::default(),
        }
    }
}

impl ConnectionProperties {
    /// Parses the connection-scoped keys out of `bag`: `workload`,
    /// `externalClientContext`, `dataspace`, `networkTimeout`,
    /// `headers.<name>`, plus the statement defaults.
    pub fn parse(bag: &mut PropertyBag) -> Result<Self> {
        let workload = bag.take_or("workload", DEFAULT_WORKLOAD);
        let external_client_context = bag.take("externalClientContext");
        let dataspace = bag.take("dataspace");
        let network_timeout = bag.take_secs("networkTimeout")?.unwrap_or(Duration::ZERO);
        let additional_headers = bag.take_prefixed("headers.");
        let statement = StatementProperties::parse(bag)?;
        Ok(ConnectionProperties {
            workload,
            external_client_context,
            dataspace,
            additional_headers,
            network_timeout,
            statement,
        })
    }

    /// Serializes back into property form; inverse of [`Self::parse`].
    pub fn to_properties(&self) -> HashMap<String, String> {
        let mut out = HashMap::new();
        if self.workload != DEFAULT_WORKLOAD {
            out.insert("workload".to_string(), self.workload.clone());
        }
        if let Some(context) = &self.external_client_context {
            out.insert("externalClientContext".to_string(), context.clone());
        }
        if let Some(dataspace) = &self.dataspace {
            out.insert("dataspace".to_string(), dataspace.clone());
        }
        if !self.network_timeout.is_zero() {
            out.insert(
                "networkTimeout".to_string(),
                self.network_timeout.as_secs().to_string(),
            );
        }
        for (name, value) in &self.additional_headers {
            out.insert(format!("headers.{}", name), value.clone());
        }
        self.statement.to_properties(&mut out);
        out
    }

    /// The outbound metadata pairs attached to every call: the workload tag,
    /// the optional client context and dataspace, then the additional headers
    /// verbatim. Names are ASCII and case-insensitive on the wire.
    pub fn metadata_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("x-hyperdb-workload".to_string(), self.workload.clone())];
        if let Some(context) = &self.external_client_context {
            if !context.is_empty() {
                pairs.push((
                    "x-hyperdb-external-client-context".to_string(),
                    context.clone(),
                ));
            }
        }
        if let Some(dataspace) = &self.dataspace {
            if !dataspace.is_empty() {
                pairs.push(("dataspace".to_string(), dataspace.clone()));
            }
        }
        for (name, value) in &self.additional_headers {
            pairs.push((name.clone(), value.clone()));
        }
        pairs
    }

    /// Network safety-net timeout, `None` when infinite.
    pub(crate) fn network_timeout_opt(&self) -> Option<Duration> {
        if self.network_timeout.is_zero() {
            None
        } else {
            Some(self.network_timeout)
        }
    }
}
