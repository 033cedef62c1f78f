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

use std::path::PathBuf;
use std::time::Duration;

use tonic::Code;

use crate::errors::{Error, Result};
use crate::properties::PropertyBag;

/// Fixed cap on a single inbound wire message.
pub const MAX_INBOUND_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// HTTP/2 keep-alive knobs, applied when `grpc.keepAlive=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Interval between keep-alive pings.
    pub time: Duration,
    /// How long to wait for a ping acknowledgement.
    pub timeout: Duration,
    /// Whether to ping on idle connections with no in-flight calls.
    pub without_calls: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        KeepAliveConfig {
            time: Duration::from_secs(60),
            timeout: Duration::from_secs(10),
            without_calls: false,
        }
    }
}

/// Transport-level retry policy for the statuses named in
/// [`RetryPolicyConfig::retryable_status_codes`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicyConfig {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Cap on the delay between retries.
    pub max_backoff: Duration,
    /// Growth factor applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Statuses that may be retried.
    pub retryable_status_codes: Vec<Code>,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        RetryPolicyConfig {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            retryable_status_codes: vec![Code::Unavailable],
        }
    }
}

/// TLS mode of a direct transport, detected from the `ssl.*` properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SslMode {
    /// Plaintext; `ssl.disabled=true`.
    Disabled,
    /// One-sided TLS trusting the system roots.
    SystemTrust,
    /// One-sided TLS trusting a caller-provided CA bundle.
    CustomTrust {
        /// PEM bundle with the trusted roots.
        ca_path: PathBuf,
    },
    /// Mutual TLS with a client certificate and key.
    MutualTls {
        /// PEM client certificate chain.
        cert_path: PathBuf,
        /// PEM client private key.
        key_path: PathBuf,
        /// Optional CA bundle; system roots when absent.
        ca_path: Option<PathBuf>,
    },
}

/// Transport-wide channel configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelProperties {
    /// Keep-alive pings; `None` disables them.
    pub keep_alive: Option<KeepAliveConfig>,
    /// Idle timeout accepted for property compatibility; the channel itself
    /// exposes no idle control.
    pub idle_timeout: Duration,
    /// Retry policy; `None` when `grpc.enableRetries=false`.
    pub retry: Option<RetryPolicyConfig>,
    /// TLS mode.
    pub ssl: SslMode,
}

impl Default for ChannelProperties {
    fn default() -> Self {
        ChannelProperties {
            keep_alive: None,
            idle_timeout: Duration::from_secs(300),
            retry: Some(RetryPolicyConfig::default()),
            ssl: SslMode::SystemTrust,
        }
    }
}

impl ChannelProperties {
    /// Parses the channel-scoped keys out of `bag`. Gated sub-keys are
    /// consumed even when their gate is off, so flipping the gate never turns
    /// a previously valid bag into an unknown-key rejection.
    pub fn parse(bag: &mut PropertyBag) -> Result<Self> {
        let keep_alive_enabled = bag.take_bool("grpc.keepAlive", false)?;
        let mut keep_alive = KeepAliveConfig::default();
        if let Some(time) = bag.take_secs("grpc.keepAlive.time")? {
            keep_alive.time = time;
        }
        if let Some(timeout) = bag.take_secs("grpc.keepAlive.timeout")? {
            keep_alive.timeout = timeout;
        }
        keep_alive.without_calls = bag.take_bool("grpc.keepAlive.withoutCalls", false)?;
        let idle_timeout = bag
            .take_secs("grpc.idleTimeoutSeconds")?
            .unwrap_or(Duration::from_secs(300));

        let retries_enabled = bag.take_bool("grpc.enableRetries", true)?;
        let mut retry = RetryPolicyConfig::default();
        if let Some(attempts) = bag.take_parsed::<u32>("grpc.retryPolicy.maxAttempts")? {
            retry.max_attempts = attempts;
        }
        if let Some(raw) = bag.take("grpc.retryPolicy.initialBackoff") {
            retry.initial_backoff = parse_grpc_duration(&raw)?;
        }
        if let Some(raw) = bag.take("grpc.retryPolicy.maxBackoff") {
            retry.max_backoff = parse_grpc_duration(&raw)?;
        }
        if let Some(multiplier) =
            bag.take_parsed::<f64>("grpc.retryPolicy.backoffMultiplier")?
        {
            retry.backoff_multiplier = multiplier;
        }
        if let Some(raw) = bag.take("grpc.retryPolicy.retryableStatusCodes") {
            retry.retryable_status_codes = raw
                .split(',')
                .map(|name| parse_status_code(name.trim()))
                .collect::<Result<Vec<Code>>>()?;
        }

        let ssl = Self::parse_ssl(bag)?;

        Ok(ChannelProperties {
            keep_alive: keep_alive_enabled.then_some(keep_alive),
            idle_timeout,
            retry: retries_enabled.then_some(retry),
            ssl,
        })
    }

    /// Mode detection ladder: explicit disable, then mutual TLS when a client
    /// keypair is present, then custom trust, then system trust.
    fn parse_ssl(bag: &mut PropertyBag) -> Result<SslMode> {
        let disabled = bag.take_bool("ssl.disabled", false)?;
        let cert_path = bag.take("ssl.client.certPath").map(PathBuf::from);
        let key_path = bag.take("ssl.client.keyPath").map(PathBuf::from);
        let ca_path = bag
            .take("ssl.ca.certPath")
            .or_else(|| bag.take("ssl.truststore.path"))
            .map(PathBuf::from);
        if disabled {
            return Ok(SslMode::Disabled);
        }
        match (cert_path, key_path) {
            (Some(cert_path), Some(key_path)) => Ok(SslMode::MutualTls {
                cert_path,
                key_path,
                ca_path,
            }),
            (None, None) => Ok(match ca_path {
                Some(ca_path) => SslMode::CustomTrust { ca_path },
                None => SslMode::SystemTrust,
            }),
            _ => Err(Error::Config(
                "ssl.client.certPath and ssl.client.keyPath must be set together"
                    .to_string(),
            )),
        }
    }
}

/// Parses durations in the gRPC service-config form, e.g. `0.5s` or `30s`.
fn parse_grpc_duration(raw: &str) -> Result<Duration> {
    let err = || Error::Config(format!("invalid duration {:?}, expected e.g. \"0.5s\"", raw));
    let seconds = raw.strip_suffix('s').ok_or_else(err)?;
    let value: f64 = seconds.parse().map_err(|_| err())?;
    if !value.is_finite() || value < 0.0 {
        return Err(err());
    }
    Ok(Duration::from_secs_f64(value))
}

fn parse_status_code(name: &str) -> Result<Code> {
    let code = match name {
        "CANCELLED" => Code::Cancelled,
        "UNKNOWN" => Code::Unknown,
        "INVALID_ARGUMENT" => Code::InvalidArgument,
        "DEADLINE_EXCEEDED" => Code::DeadlineExceeded,
        "NOT_FOUND" => Code::NotFound,
        "ALREADY_EXISTS" => Code::AlreadyExists,
        "PERMISSION_DENIED" => Code::PermissionDenied,
        "RESOURCE_EXHAUSTED" => Code::ResourceExhausted,
        "FAILED_PRECONDITION" => Code::FailedPrecondition,
        "ABORTED" => Code::Aborted,
        "OUT_OF_RANGE" => Code::OutOfRange,
        "UNIMPLEMENTED" => Code::Unimplemented,
        "INTERNAL" => Code::Internal,
        "UNAVAILABLE" => Code::Unavailable,
        "DATA_LOSS" => Code::DataLoss,
        "UNAUTHENTICATED" => Code::Unauthenticated,
        _ => {
            return Err(Error::Config(format!(
                "unknown status code {:?} in grpc.retryPolicy.retryableStatusCodes",
                name
            )))
        }
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
        PropertyBag::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_retries_on_keepalive_off() {
        let props = ChannelProperties::parse(&mut bag(&[])).unwrap();
        assert_eq!(props.keep_alive, None);
        assert_eq!(props.idle_timeout, Duration::from_secs(300));
        let retry = props.retry.expect("retries on by default");
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_backoff, Duration::from_millis(500));
        assert_eq!(retry.max_backoff, Duration::from_secs(30));
        assert_eq!(retry.retryable_status_codes, vec![Code::Unavailable]);
        assert_eq!(props.ssl, SslMode::SystemTrust);
    }

    #[test]
    fn keepalive_sub_keys_apply_when_enabled() {
        let mut b = bag(&[
            ("grpc.keepAlive", "true"),
            ("grpc.keepAlive.time", "15"),
            ("grpc.keepAlive.timeout", "3"),
            ("grpc.keepAlive.withoutCalls", "true"),
        ]);
        let props = ChannelProperties::parse(&mut b).unwrap();
        assert!(b.reject_residual().is_ok());
        let keep_alive = props.keep_alive.unwrap();
        assert_eq!(keep_alive.time, Duration::from_secs(15));
        assert_eq!(keep_alive.timeout, Duration::from_secs(3));
        assert!(keep_alive.without_calls);
    }

    #[test]
    fn gated_sub_keys_are_consumed_when_gate_is_off() {
        let mut b = bag(&[
            ("grpc.keepAlive.time", "15"),
            ("grpc.enableRetries", "false"),
            ("grpc.retryPolicy.maxAttempts", "9"),
        ]);
        let props = ChannelProperties::parse(&mut b).unwrap();
        assert!(b.reject_residual().is_ok());
        assert_eq!(props.keep_alive, None);
        assert_eq!(props.retry, None);
    }

    #[test]
    fn retry_policy_keys_override_defaults() {
        let mut b = bag(&[
            ("grpc.retryPolicy.maxAttempts", "3"),
            ("grpc.retryPolicy.initialBackoff", "0.25s"),
            ("grpc.retryPolicy.maxBackoff", "10s"),
            ("grpc.retryPolicy.backoffMultiplier", "1.5"),
            (
                "grpc.retryPolicy.retryableStatusCodes",
                "UNAVAILABLE, RESOURCE_EXHAUSTED",
            ),
        ]);
        let retry = ChannelProperties::parse(&mut b).unwrap().retry.unwrap();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_backoff, Duration::from_millis(250));
        assert_eq!(retry.max_backoff, Duration::from_secs(10));
        assert_eq!(retry.backoff_multiplier, 1.5);
        assert_eq!(
            retry.retryable_status_codes,
            vec![Code::Unavailable, Code::ResourceExhausted]
        );
    }

    #[test]
    fn bad_durations_and_codes_are_rejected() {
        let mut b = bag(&[("grpc.retryPolicy.initialBackoff", "500ms")]);
        assert!(ChannelProperties::parse(&mut b).is_err());
        let mut b = bag(&[("grpc.retryPolicy.retryableStatusCodes", "NO_SUCH")]);
        assert!(ChannelProperties::parse(&mut b).is_err());
    }

    #[test]
    fn ssl_ladder_detects_each_mode() {
        let props = ChannelProperties::parse(&mut bag(&[("ssl.disabled", "true")])).unwrap();
        assert_eq!(props.ssl, SslMode::Disabled);

        let props = ChannelProperties::parse(&mut bag(&[
            ("ssl.client.certPath", "/tls/client.pem"),
            ("ssl.client.keyPath", "/tls/client.key"),
            ("ssl.ca.certPath", "/tls/ca.pem"),
        ]))
        .unwrap();
        assert_eq!(
            props.ssl,
            SslMode::MutualTls {
                cert_path: "/tls/client.pem".into(),
                key_path: "/tls/client.key".into(),
                ca_path: Some("/tls/ca.pem".into()),
            }
        );

        let props =
            ChannelProperties::parse(&mut bag(&[("ssl.truststore.path", "/tls/ca.pem")]))
                .unwrap();
        assert_eq!(props.ssl, SslMode::CustomTrust { ca_path: "/tls/ca.pem".into() });

        let err = ChannelProperties::parse(&mut bag(&[(
            "ssl.client.certPath",
            "/tls/client.pem",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("together"));
    }
}
