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

//! Typed configuration parsed from a flat property bag.
//!
//! Parsing is destructive: each parser removes the keys it recognizes, and
//! whatever remains after every parser has run is rejected with the offending
//! key names. A typo therefore fails loudly instead of being silently
//! ignored.

mod channel_properties;
mod connection_properties;
mod statement_properties;

pub use self::channel_properties::{
    ChannelProperties, KeepAliveConfig, RetryPolicyConfig, SslMode, MAX_INBOUND_MESSAGE_BYTES,
};
pub use self::connection_properties::ConnectionProperties;
pub use self::statement_properties::{
    StatementProperties, MAX_RESULT_BYTES, MIN_RESULT_BYTES,
};

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{Error, Result};

/// A flat `key=value` property bag, consumed destructively by the typed
/// parsers.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    values: HashMap<String, String>,
}

impl PropertyBag {
    /// Wraps a property map for parsing.
    pub fn new(values: HashMap<String, String>) -> Self {
        PropertyBag { values }
    }

    /// Removes and returns the value for `key`.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Removes `key`, falling back to `default` when absent.
    pub fn take_or(&mut self, key: &str, default: &str) -> String {
        self.take(key).unwrap_or_else(|| default.to_string())
    }

    /// Removes and parses `key` with [`FromStr`].
    pub fn take_parsed<T: FromStr>(&mut self, key: &str) -> Result<Option<T>> {
        match self.take(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                Error::Config(format!("invalid value {:?} for property {}", raw, key))
            }),
        }
    }

    /// Removes and parses a boolean `key`, defaulting when absent.
    pub fn take_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        Ok(self.take_parsed::<bool>(key)?.unwrap_or(default))
    }

    /// Removes and parses `key` as a whole number of seconds.
    pub fn take_secs(&mut self, key: &str) -> Result<Option<Duration>> {
        Ok(self.take_parsed::<u64>(key)?.map(Duration::from_secs))
    }

    /// Removes every key starting with `prefix` and returns `(suffix, value)`
    /// pairs sorted by suffix.
    pub fn take_prefixed(&mut self, prefix: &str) -> Vec<(String, String)> {
        let keys: Vec<String> = self
            .values
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        let mut pairs: Vec<(String, String)> = keys
            .into_iter()
            .map(|k| {
                let value = self.values.remove(&k).unwrap_or_default();
                (k[prefix.len()..].to_string(), value)
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// Fails when unrecognized keys remain after all parsers have run.
    pub fn reject_residual(&self) -> Result<()> {
        if self.values.is_empty() {
            return Ok(());
        }
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        Err(Error::Config(format!(
            "unrecognized properties: {}",
            names.join(", ")
        )))
    }
}
