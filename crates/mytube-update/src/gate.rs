//! Update gating.
//!
//! A strictly newer version starts a grace period on first sighting; once
//! the grace period elapses, or the backend marks the version mandatory,
//! the app blocks until it is updated. A version at or below the current
//! one clears any pending grace period. Every fetch failure degrades to
//! `Proceed` — availability wins over update enforcement.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::descriptor::VersionDescriptor;
use crate::store::UpdateState;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Days a non-mandatory update may be deferred before it blocks.
const DEFAULT_GRACE_PERIOD_DAYS: u64 = 1;

/// What startup should do.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// No update outstanding (or the check failed); load the site.
    Proceed,
    /// A deferrable update exists; surface it, then load the site.
    Prompt {
        days_remaining: u64,
        descriptor: VersionDescriptor,
    },
    /// Usage is blocked until the app is updated.
    Block { descriptor: VersionDescriptor },
}

/// Session-level gating state, owned by the shell as a single enum rather
/// than scattered flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NoUpdateSeen,
    GracePeriod,
    Blocking,
}

impl GateDecision {
    /// The session state this decision puts the app in. `Blocking` has no
    /// forward transition short of an external app update.
    pub fn state(&self) -> GateState {
        match self {
            GateDecision::Proceed => GateState::NoUpdateSeen,
            GateDecision::Prompt { .. } => GateState::GracePeriod,
            GateDecision::Block { .. } => GateState::Blocking,
        }
    }
}

/// Evaluates a fetched version descriptor against the running version and
/// the persisted first-seen timestamp.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    current_version: u32,
    grace_period_days: u64,
}

impl UpdateGate {
    pub fn new(current_version: u32) -> Self {
        Self {
            current_version,
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
        }
    }

    pub fn with_grace_period(mut self, days: u64) -> Self {
        self.grace_period_days = days;
        self
    }

    /// Decide whether startup proceeds, prompts, or blocks. Mutates
    /// `state` (sets the first-seen timestamp on first sighting of a newer
    /// version, clears it when no update is outstanding); the caller
    /// persists it afterwards.
    pub fn evaluate(
        &self,
        fetched: Option<VersionDescriptor>,
        state: &mut UpdateState,
        now: SystemTime,
    ) -> GateDecision {
        // Fetch failure or no rows: never block on a missing backend.
        let Some(descriptor) = fetched else {
            return GateDecision::Proceed;
        };

        // The minimum-version floor forces blocking regardless of the
        // descriptor's own mandatory flag.
        if self.current_version < descriptor.min_supported_version {
            info!(
                "version {} is below the supported floor {}",
                self.current_version, descriptor.min_supported_version
            );
            return GateDecision::Block { descriptor };
        }

        if descriptor.version_code <= self.current_version {
            state.first_seen = None;
            return GateDecision::Proceed;
        }

        // Strictly newer version: the grace clock starts at first sighting.
        let now_secs = unix_secs(now);
        let first_seen = *state.first_seen.get_or_insert(now_secs);
        let days_elapsed = now_secs.saturating_sub(first_seen) / SECS_PER_DAY;

        if descriptor.is_mandatory || days_elapsed >= self.grace_period_days {
            info!(
                "update to {} is now blocking (mandatory: {}, days elapsed: {})",
                descriptor.version_name, descriptor.is_mandatory, days_elapsed
            );
            GateDecision::Block { descriptor }
        } else {
            GateDecision::Prompt {
                days_remaining: self.grace_period_days - days_elapsed,
                descriptor,
            }
        }
    }
}

/// Seconds since the Unix epoch; a pre-epoch clock saturates to zero so a
/// backwards clock step cannot underflow the grace arithmetic.
fn unix_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
