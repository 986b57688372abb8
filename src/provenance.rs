use chrono::{DateTime, Utc};
use uuid::Uuid;

// ============================================================================
// Provenance - who did it, and when
// ============================================================================
//
// Injected into the command handler so event timestamps and actors can be
// pinned in tests.
//
// ============================================================================

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait CurrentUserProvider: Send + Sync {
    fn current_user(&self) -> Option<Uuid>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// No user attached to events
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CurrentUserProvider for Anonymous {
    fn current_user(&self) -> Option<Uuid> {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedUser(pub Uuid);

impl CurrentUserProvider for FixedUser {
    fn current_user(&self) -> Option<Uuid> {
        Some(self.0)
    }
}
