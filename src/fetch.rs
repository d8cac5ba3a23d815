//! Blocking HTTP plumbing.
//!
//! One small client wrapper shared by every resolver, plus the
//! ordered-candidates combinator both the manifest and checksum resolvers
//! iterate with. All fetches are synchronous; redundancy comes from candidate
//! lists, never from retries.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;

use crate::error::{Result, UpdateError};

/// Fixed client-level timeout applied to every request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How much of an error body is worth quoting back.
const MAX_ERROR_BODY_CHARS: usize = 1024;

/// Optional wall-clock bound on a whole policy check.
///
/// Each request runs under `min(FETCH_TIMEOUT, remaining)`; once the deadline
/// passes, further fetch attempts fail immediately and follow the same
/// fatal-or-absorbed routing as any other fetch error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No bound; requests run under the client timeout only.
    pub fn none() -> Self {
        Self(None)
    }

    /// Expire at a fixed instant.
    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// Expire after `budget` from now.
    pub fn within(budget: Duration) -> Self {
        Self(Some(Instant::now() + budget))
    }

    /// Time left before expiry; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has already passed.
    pub fn expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }
}

/// Blocking HTTP client carrying the engine's fixed timeout.
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(concat!("tnr-update/", env!("CARGO_PKG_VERSION")))
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// GET a URL and return the body as text.
    ///
    /// Anything but HTTP 200 is an error carrying the status and the first
    /// KiB of the body.
    pub fn get_text(&self, url: &str, deadline: Deadline) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(remaining) = deadline.remaining() {
            if remaining.is_zero() {
                return Err(UpdateError::DeadlineExceeded {
                    url: url.to_string(),
                });
            }
            request = request.timeout(remaining.min(FETCH_TIMEOUT));
        }

        let response = request.send().map_err(|source| UpdateError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(UpdateError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.text().map_err(|source| UpdateError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// GET a URL and decode the JSON body. `what` names the payload kind in
    /// decode errors.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        what: &'static str,
        url: &str,
        deadline: Deadline,
    ) -> Result<T> {
        let body = self.get_text(url, deadline)?;
        serde_json::from_str(&body).map_err(|source| UpdateError::Decode {
            what,
            url: url.to_string(),
            source,
        })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// First successful result from an ordered sequence of fallible attempts.
///
/// Returns the winning candidate together with its value. On exhaustion the
/// last error comes back, or `None` when the sequence was empty.
pub(crate) fn first_success<C, T, E>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: impl FnMut(&C) -> std::result::Result<T, E>,
) -> std::result::Result<(C, T), Option<E>> {
    let mut last_err = None;
    for candidate in candidates {
        match attempt(&candidate) {
            Ok(value) => return Ok((candidate, value)),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err)
}
