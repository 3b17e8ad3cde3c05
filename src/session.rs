//! Inactivity timeout for a signed-in session.
//!
//! The timer is poll-driven: the caller ticks [`SessionTimer::poll`] on its
//! own cadence and reacts to the returned event. At ten idle minutes a
//! warning fires once; at fifteen the session times out, the `currentUser`
//! slot is cleared, and the timeout is logged. Any recorded activity
//! re-arms both thresholds.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::info;

use crate::activity::{self, tags, ActivitySource};
use crate::db::DbState;
use crate::staff::StaffProfile;
use crate::store;

/// Idle minutes before the session is ended.
pub const SESSION_TIMEOUT_MINUTES: i64 = 15;

/// Minutes of warning given before the timeout fires.
pub const INACTIVITY_WARNING_MINUTES: i64 = 5;

/// Event surfaced by one [`SessionTimer::poll`] tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Five minutes remain. Fired at most once per idle stretch.
    Warning,
    /// The session ended. Fired exactly once per timer.
    TimedOut,
}

/// Inactivity tracker for one signed-in staff member.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    staff_id: i64,
    staff_name: String,
    last_activity: DateTime<Utc>,
    warning_fired: bool,
    timed_out: bool,
}

impl SessionTimer {
    pub fn new(profile: &StaffProfile, now: DateTime<Utc>) -> Self {
        SessionTimer {
            staff_id: profile.id,
            staff_name: profile.name.clone(),
            last_activity: now,
            warning_fired: false,
            timed_out: false,
        }
    }

    /// Any user interaction. Resets the idle clock and re-arms the warning.
    /// Ignored once the session has timed out.
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        if self.timed_out {
            return;
        }
        self.last_activity = now;
        self.warning_fired = false;
    }

    /// Explicit "keep me signed in" from the warning prompt.
    pub fn extend(&mut self, now: DateTime<Utc>) {
        self.record_activity(now);
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Whole idle minutes until timeout, clamped at zero.
    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> i64 {
        let left = SESSION_TIMEOUT_MINUTES - (now - self.last_activity).num_minutes();
        left.max(0)
    }

    /// Advance the timer to `now`. On timeout the signed-in user slot is
    /// cleared and a session log entry is appended before the event is
    /// returned.
    pub fn poll(&mut self, db: &DbState, now: DateTime<Utc>) -> Result<Option<SessionEvent>, String> {
        if self.timed_out {
            return Ok(None);
        }
        let idle = now - self.last_activity;
        if idle >= Duration::minutes(SESSION_TIMEOUT_MINUTES) {
            self.timed_out = true;
            store::remove_slot(db, store::CURRENT_USER_KEY)?;
            activity::log_activity(
                db,
                ActivitySource::Session,
                tags::SESSION_TIMEOUT,
                Some((self.staff_id, &self.staff_name)),
                json!({ "idleMinutes": idle.num_minutes() }),
                now,
            )?;
            info!(staff = %self.staff_name, "session timed out after inactivity");
            return Ok(Some(SessionEvent::TimedOut));
        }
        let warning_after = SESSION_TIMEOUT_MINUTES - INACTIVITY_WARNING_MINUTES;
        if idle >= Duration::minutes(warning_after) && !self.warning_fired {
            self.warning_fired = true;
            return Ok(Some(SessionEvent::Warning));
        }
        Ok(None)
    }
}
