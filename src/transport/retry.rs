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

//! Transport-level retries.
//!
//! Call *initiation* is retried for the statuses named in the channel's retry
//! policy; the layers above never retry. Only idempotent initiations go
//! through [`invoke`]; the executor decides which calls qualify.

use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;
use tonic::{Code, Status};

use crate::properties::RetryPolicyConfig;

/// Exponential backoff ladder with jitter.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Delay before the first retry.
    pub initial: Duration,
    /// Cap on any single delay.
    pub max: Duration,
    /// Growth factor per retry.
    pub multiplier: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl Backoff {
    /// The capped delay before retry number `attempt` (1-based), without
    /// jitter.
    pub fn ceiling_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        let delay = self.initial.mul_f64(factor.max(1.0));
        delay.min(self.max)
    }

    /// The jittered delay before retry number `attempt`: uniform in
    /// `[ceiling / 2, ceiling]` so synchronized clients fan out.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling_for(attempt);
        if ceiling.is_zero() {
            return ceiling;
        }
        let factor: f64 = rand::thread_rng().gen_range(0.5..=1.0);
        ceiling.mul_f64(factor)
    }
}

/// Retry settings applied to one call initiation.
#[derive(Debug, Clone)]
pub struct CallSettings {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay ladder between attempts.
    pub backoff: Backoff,
    /// Statuses worth retrying.
    pub retryable: Vec<Code>,
}

impl From<&RetryPolicyConfig> for CallSettings {
    fn from(config: &RetryPolicyConfig) -> Self {
        CallSettings {
            max_attempts: config.max_attempts.max(1),
            backoff: Backoff {
                initial: config.initial_backoff,
                max: config.max_backoff,
                multiplier: config.backoff_multiplier,
            },
            retryable: config.retryable_status_codes.clone(),
        }
    }
}

/// Runs `call`, retrying per `settings`. `None` settings means retries are
/// disabled and the first failure is final.
pub async fn invoke<T, F, Fut>(
    settings: Option<&CallSettings>,
    operation: &str,
    mut call: F,
) -> std::result::Result<T, Status>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, Status>>,
{
    let Some(settings) = settings else {
        return call().await;
    };
    let mut attempt = 1u32;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(status)
                if attempt < settings.max_attempts
                    && settings.retryable.contains(&status.code()) =>
            {
                let delay = settings.backoff.delay_for(attempt);
                warn!(
                    "{} failed with {:?} (attempt {}/{}), retrying in {:?}",
                    operation,
                    status.code(),
                    attempt,
                    settings.max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(status) => return Err(status),
        }
    }
}
