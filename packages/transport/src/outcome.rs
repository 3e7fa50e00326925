//! Fresh-vs-degraded results.
//!
//! Weather and prediction flows must always hand the caller something
//! renderable. Instead of swallowing errors at each call site, every
//! network attempt goes through [`attempt_or_degrade`], which turns a
//! failure into an [`Outcome::Degraded`] carrying both the locally
//! produced value and the reason the network path was abandoned.

use std::fmt::Display;
use std::future::Future;

/// A value obtained either from the network or from a local fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The network call succeeded.
    Fresh(T),
    /// The network call failed and `value` was produced locally.
    Degraded {
        /// Locally produced stand-in.
        value: T,
        /// Why the network path was abandoned.
        reason: String,
    },
}

impl<T> Outcome<T> {
    /// Returns the carried value, discarding provenance.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    /// Borrows the carried value.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    /// Returns `true` if the value came from a local fallback.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Returns the degradation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Maps the carried value, keeping provenance.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Fresh(value) => Outcome::Fresh(f(value)),
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}

/// Awaits `attempt`; on error, logs and returns `degrade()` as
/// [`Outcome::Degraded`].
///
/// `label` names the operation in the log line.
pub async fn attempt_or_degrade<T, E, Fut, D>(label: &str, attempt: Fut, degrade: D) -> Outcome<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnOnce() -> T,
{
    match attempt.await {
        Ok(value) => Outcome::Fresh(value),
        Err(e) => {
            log::warn!("{label} failed, using local fallback: {e}");
            Outcome::Degraded {
                value: degrade(),
                reason: e.to_string(),
            }
        }
    }
}
