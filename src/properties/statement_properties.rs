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

use std::collections::BTreeMap;
use std::time::Duration;

use crate::errors::{Error, Result};
use crate::properties::PropertyBag;

/// Smallest accepted per-page byte bound for result fetches.
pub const MIN_RESULT_BYTES: u64 = 1024 * 1024;
/// Largest accepted per-page byte bound for result fetches. Stays below the
/// fixed inbound message cap so one page always fits in one call.
pub const MAX_RESULT_BYTES: u64 = 32 * 1024 * 1024;

const DEFAULT_LOCAL_ENFORCEMENT_DELAY: Duration = Duration::from_secs(5);

/// The server-side setting injected from [`StatementProperties::query_timeout`].
/// Passing it as an explicit `querySetting.` is rejected so the two sources
/// cannot disagree.
const RESERVED_SETTING: &str = "query_timeout";

/// Per-statement execution parameters.
///
/// Mutable through setters until the statement is executed; execution clones
/// the value, so later changes only affect later executions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementProperties {
    query_timeout: Duration,
    local_enforcement_delay: Duration,
    query_settings: BTreeMap<String, String>,
    target_max_rows: u64,
    target_max_bytes: u64,
}

impl Default for StatementProperties {
    fn default() -> Self {
        StatementProperties {
            query_timeout: Duration::ZERO,
            local_enforcement_delay: DEFAULT_LOCAL_ENFORCEMENT_DELAY,
            query_settings: BTreeMap::new(),
            target_max_rows: 0,
            target_max_bytes: 0,
        }
    }
}

impl StatementProperties {
    /// Parses the statement-scoped keys out of `bag`:
    /// `queryTimeout`, `queryTimeoutLocalEnforcementDelay` and
    /// `querySetting.<name>`.
    pub fn parse(bag: &mut PropertyBag) -> Result<Self> {
        let mut props = StatementProperties::default();
        if let Some(timeout) = bag.take_secs("queryTimeout")? {
            props.query_timeout = timeout;
        }
        if let Some(delay) = bag.take_secs("queryTimeoutLocalEnforcementDelay")? {
            props.local_enforcement_delay = delay;
        }
        for (name, value) in bag.take_prefixed("querySetting.") {
            props.set_query_setting(&name, &value)?;
        }
        Ok(props)
    }

    /// Serializes back into property form; inverse of [`Self::parse`].
    pub fn to_properties(&self, out: &mut std::collections::HashMap<String, String>) {
        if !self.query_timeout.is_zero() {
            out.insert(
                "queryTimeout".to_string(),
                self.query_timeout.as_secs().to_string(),
            );
        }
        if self.local_enforcement_delay != DEFAULT_LOCAL_ENFORCEMENT_DELAY {
            out.insert(
                "queryTimeoutLocalEnforcementDelay".to_string(),
                self.local_enforcement_delay.as_secs().to_string(),
            );
        }
        for (name, value) in &self.query_settings {
            out.insert(format!("querySetting.{}", name), value.clone());
        }
    }

    /// Server-enforced query timeout; [`Duration::ZERO`] means no timeout.
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Sets the server-enforced query timeout.
    pub fn set_query_timeout(&mut self, timeout: Duration) {
        self.query_timeout = timeout;
    }

    /// Extra time the client waits beyond the query timeout before tripping
    /// its own deadline, so the server's SQLSTATE-bearing error can arrive
    /// first.
    pub fn local_enforcement_delay(&self) -> Duration {
        self.local_enforcement_delay
    }

    /// Sets the local enforcement grace.
    pub fn set_local_enforcement_delay(&mut self, delay: Duration) {
        self.local_enforcement_delay = delay;
    }

    /// Adds an arbitrary server setting forwarded verbatim with the query.
    /// Names naming the reserved `query_timeout` setting are rejected; use
    /// [`Self::set_query_timeout`] instead.
    pub fn set_query_setting(&mut self, name: &str, value: &str) -> Result<()> {
        if name.contains(RESERVED_SETTING) {
            return Err(Error::Config(format!(
                "query setting {:?} is reserved, use the queryTimeout property instead",
                name
            )));
        }
        self.query_settings.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Server settings configured on this statement.
    pub fn query_settings(&self) -> &BTreeMap<String, String> {
        &self.query_settings
    }

    /// Target number of rows per result page; zero disables paging.
    pub fn target_max_rows(&self) -> u64 {
        self.target_max_rows
    }

    /// Sets the target rows per result page.
    pub fn set_target_max_rows(&mut self, rows: u64) {
        self.target_max_rows = rows;
    }

    /// Target byte size per result page; zero leaves it to the server.
    pub fn target_max_bytes(&self) -> u64 {
        self.target_max_bytes
    }

    /// Sets the target bytes per result page.
    pub fn set_target_max_bytes(&mut self, bytes: u64) {
        self.target_max_bytes = bytes;
    }

    /// Validates the row/byte page bounds before they go on the wire: a row
    /// bound requires a byte bound within
    /// [`MIN_RESULT_BYTES`]..=[`MAX_RESULT_BYTES`].
    pub fn validate(&self) -> Result<()> {
        if self.target_max_rows > 0
            && !(MIN_RESULT_BYTES..=MAX_RESULT_BYTES).contains(&self.target_max_bytes)
        {
            return Err(Error::Config(format!(
                "target_max_bytes must be within [{}, {}] when target_max_rows is set, got {}",
                MIN_RESULT_BYTES, MAX_RESULT_BYTES, self.target_max_bytes
            )));
        }
        Ok(())
    }

    /// The settings map sent with `ExecuteQuery`: the configured settings
    /// plus the injected `query_timeout` entry.
    pub(crate) fn server_query_settings(
        &self,
    ) -> std::collections::HashMap<String, String> {
        let mut settings: std::collections::HashMap<String, String> = self
            .query_settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !self.query_timeout.is_zero() {
            settings.insert(
                RESERVED_SETTING.to_string(),
                format!("{}s", self.query_timeout.as_secs()),
            );
        }
        settings
    }

    /// The timeout the client enforces per call on behalf of this statement:
    /// `query_timeout + local grace`, or `None` when the query timeout is
    /// infinite.
    pub(crate) fn enforced_timeout(&self) -> Option<Duration> {
        if self.query_timeout.is_zero() {
            None
        } else {
            Some(self.query_timeout + self.local_enforcement_delay)
        }
    }
}
