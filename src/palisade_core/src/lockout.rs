use chrono::{DateTime, Duration, Utc};

pub const GENERIC_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
pub const PERMANENT_LOCK_MESSAGE: &str =
    "Your account has been locked, please contact an administrator.";

/// An account's failure history, as read from and written back to the user
/// store alongside the rest of the credential record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    pub failed_attempts: u32,
    pub temp_locked: bool,
    pub perm_locked: bool,
    pub last_failed_at: Option<DateTime<Utc>>,
}

/// Outcome of the pre-verification lockout check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Credential verification may run. `cleared_temporary_lock` is true when
    /// this check expired a temporary lock; the caller must persist the
    /// updated state.
    Proceed { cleared_temporary_lock: bool },
    /// The attempt is rejected before any credential is examined.
    Rejected(LockRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockRejection {
    Permanent,
    Temporary { remaining: Duration },
}

impl LockRejection {
    pub fn message(&self) -> String {
        match self {
            Self::Permanent => PERMANENT_LOCK_MESSAGE.to_string(),
            Self::Temporary { remaining } => temporary_lock_message(*remaining),
        }
    }
}

/// Pure decision logic over an account's failure history.
///
/// Three states: unlocked, temporarily locked, permanently locked. The
/// temporary lock re-triggers on every T-th consecutive failure and expires
/// `temporary_lock_duration` after the failure that raised it. The permanent
/// lock is absorbing: only an administrator acting directly on the store can
/// clear it.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    fails_until_temporary_lock: u32,
    fails_until_permanent_lock: u32,
    temporary_lock_duration: Duration,
}

impl LockoutPolicy {
    /// `fails_until_temporary_lock` is clamped to at least 1.
    pub fn new(
        fails_until_temporary_lock: u32,
        fails_until_permanent_lock: u32,
        temporary_lock_duration: Duration,
    ) -> Self {
        Self {
            fails_until_temporary_lock: fails_until_temporary_lock.max(1),
            fails_until_permanent_lock,
            temporary_lock_duration,
        }
    }

    pub fn temporary_lock_duration(&self) -> Duration {
        self.temporary_lock_duration
    }

    /// Gate an authentication attempt before any credential is verified.
    ///
    /// A permanent lock always rejects. A temporary lock rejects while its
    /// timer still runs and is cleared (exactly once) when the timer has
    /// elapsed.
    pub fn check(&self, state: &mut LockState, now: DateTime<Utc>) -> Gate {
        if state.perm_locked {
            return Gate::Rejected(LockRejection::Permanent);
        }

        if state.temp_locked {
            if let Some(last_failed) = state.last_failed_at {
                let remaining = last_failed + self.temporary_lock_duration - now;
                if remaining > Duration::zero() {
                    return Gate::Rejected(LockRejection::Temporary { remaining });
                }
            }
            state.temp_locked = false;
            return Gate::Proceed {
                cleared_temporary_lock: true,
            };
        }

        Gate::Proceed {
            cleared_temporary_lock: false,
        }
    }

    /// Record a failed credential verification and select the user-facing
    /// message. The caller must persist the updated state before surfacing
    /// the authentication error.
    pub fn record_failure(&self, state: &mut LockState, now: DateTime<Utc>) -> String {
        state.failed_attempts = state.failed_attempts.saturating_add(1);
        if state.failed_attempts >= self.fails_until_permanent_lock {
            state.perm_locked = true;
        } else {
            state.temp_locked = state.failed_attempts % self.fails_until_temporary_lock == 0;
        }
        state.last_failed_at = Some(now);

        if state.perm_locked {
            PERMANENT_LOCK_MESSAGE.to_string()
        } else if state.temp_locked {
            temporary_lock_message(self.temporary_lock_duration)
        } else {
            GENERIC_CREDENTIALS_MESSAGE.to_string()
        }
    }

    /// Record a successful verification: the failure counter resets, lock
    /// flags are untouched.
    pub fn record_success(&self, state: &mut LockState) {
        state.failed_attempts = 0;
    }
}

fn temporary_lock_message(remaining: Duration) -> String {
    format!(
        "Too many failed login attempts, you can try again {}.",
        human_wait(remaining)
    )
}

/// Human-readable wait: exact seconds under a minute, otherwise an
/// approximate "in about N minutes/hours".
fn human_wait(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(1);
    if secs < 60 {
        format!("in {secs} second{}", if secs == 1 { "" } else { "s" })
    } else if secs < 3600 {
        let minutes = (secs as u64).div_ceil(60);
        format!(
            "in about {minutes} minute{}",
            if minutes == 1 { "" } else { "s" }
        )
    } else {
        let hours = (secs as u64).div_ceil(3600);
        format!("in about {hours} hour{}", if hours == 1 { "" } else { "s" })
    }
}
