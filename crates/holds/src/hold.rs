use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stagehall_core::{DomainError, DomainResult};

/// Length of the fixed provisional-hold window, in days.
pub const HOLD_WINDOW_DAYS: i64 = 28;

/// Hold status lifecycle. `Confirmed`, `Expired` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldState {
    Held,
    Confirmed,
    Expired,
    Cancelled,
}

impl HoldState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            HoldState::Confirmed | HoldState::Expired | HoldState::Cancelled
        )
    }
}

/// A provisional, time-limited reservation pending confirmation.
///
/// Expiry is evaluated lazily: no background timer runs, so callers must ask
/// [`Hold::is_expired`] (or attempt [`Hold::expire`]) with the current time
/// before relying on the recorded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    state: HoldState,
    expires_at: DateTime<Utc>,
}

impl Hold {
    /// Start a hold at `created_at`; it expires `HOLD_WINDOW_DAYS` later.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            state: HoldState::Held,
            expires_at: created_at + Duration::days(HOLD_WINDOW_DAYS),
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the hold window has passed for a still-held hold.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.state == HoldState::Held && now > self.expires_at
    }

    /// Whether this hold keeps its booking blocking for overlap checks.
    ///
    /// Confirmed bookings always block. A live (unexpired) hold blocks.
    /// Expired and cancelled holds never block, even before the lazy
    /// transition has been recorded.
    pub fn blocks(&self, now: DateTime<Utc>) -> bool {
        match self.state {
            HoldState::Confirmed => true,
            HoldState::Held => now <= self.expires_at,
            HoldState::Expired | HoldState::Cancelled => false,
        }
    }

    /// Held -> Confirmed.
    pub fn confirm(&mut self) -> DomainResult<()> {
        if self.state != HoldState::Held {
            return Err(DomainError::already_resolved(format!(
                "cannot confirm hold in state {:?}",
                self.state
            )));
        }
        self.state = HoldState::Confirmed;
        Ok(())
    }

    /// Held -> Expired, only once `now` is past the expiry instant.
    ///
    /// Expiring an already-expired hold is a no-op success so lazy callers
    /// can apply it unconditionally.
    pub fn expire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.state {
            HoldState::Expired => Ok(()),
            HoldState::Held if now > self.expires_at => {
                self.state = HoldState::Expired;
                Ok(())
            }
            HoldState::Held => Err(DomainError::invalid_transition(format!(
                "hold does not expire until {}",
                self.expires_at
            ))),
            other => Err(DomainError::already_resolved(format!(
                "cannot expire hold in state {other:?}"
            ))),
        }
    }

    /// Any non-terminal state -> Cancelled.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.state.is_terminal() {
            return Err(DomainError::already_resolved(format!(
                "cannot cancel hold in state {:?}",
                self.state
            )));
        }
        self.state = HoldState::Cancelled;
        Ok(())
    }
}
