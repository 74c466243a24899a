//! Per-user cooldown system for rate limiting command usage

use chrono::{DateTime, Duration, Utc};
use crstats_common::UserId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during cooldown checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CooldownError {
    /// The user's window has not expired yet.
    #[error("User {user_id} is on cooldown (remaining: {remaining_seconds}s)")]
    UserOnCooldown {
        /// The limited user.
        user_id: UserId,
        /// Seconds left, rounded up.
        remaining_seconds: i64,
    },
}

/// Fixed-window limiter keyed by user.
///
/// Each entry holds the moment the user's window expires. A rejected attempt
/// leaves the entry untouched, so spamming does not extend the wait. Entries are
/// never pruned; the table grows with the number of distinct users seen.
#[derive(Debug)]
pub struct CooldownTable {
    window: Duration,
    expiries: DashMap<UserId, DateTime<Utc>>,
}

impl CooldownTable {
    /// Create a table with the given window length
    pub fn new(window: std::time::Duration) -> Self {
        Self {
            window: Duration::from_std(window).unwrap_or_else(|_| Duration::zero()),
            expiries: DashMap::new(),
        }
    }

    /// The window length.
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Accepts the attempt and starts a new window, or rejects it if the user's
    /// window has not expired at `now`.
    pub fn check(&self, user: UserId, now: DateTime<Utc>) -> Result<(), CooldownError> {
        match self.expiries.entry(user) {
            Entry::Occupied(mut entry) => {
                let expires_at = *entry.get();
                if now < expires_at {
                    let remaining = expires_at - now;
                    return Err(CooldownError::UserOnCooldown {
                        user_id: user,
                        remaining_seconds: ceil_seconds(remaining),
                    });
                }
                entry.insert(self.expiry_from(now));
            }
            Entry::Vacant(entry) => {
                entry.insert(self.expiry_from(now));
            }
        }

        debug!("Applied cooldown for user {}", user);
        Ok(())
    }

    /// When the user's current window expires, if they have ever been seen.
    #[cfg(test)]
    pub(crate) fn expires_at(&self, user: UserId) -> Option<DateTime<Utc>> {
        self.expiries.get(&user).map(|entry| *entry.value())
    }

    // Saturates so that an absurdly long window never overflows the clock.
    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn ceil_seconds(duration: Duration) -> i64 {
    let millis = duration.num_milliseconds();
    (millis + 999) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn table() -> CooldownTable {
        CooldownTable::new(std::time::Duration::from_secs(3))
    }

    #[test]
    fn test_window_blocks_until_expiry() {
        let table = table();
        let user = UserId(1);
        assert!(table.check(user, t0()).is_ok());

        for millis in [0, 1, 1_500, 2_999] {
            let at = t0() + Duration::milliseconds(millis);
            assert!(table.check(user, at).is_err(), "accepted at +{millis}ms");
        }

        assert!(table.check(user, t0() + Duration::seconds(3)).is_ok());
    }

    #[test]
    fn test_rejection_does_not_extend_window() {
        let table = table();
        let user = UserId(1);
        table.check(user, t0()).unwrap();
        let _ = table.check(user, t0() + Duration::seconds(2));

        assert_eq!(table.expires_at(user), Some(t0() + Duration::seconds(3)));
        assert!(table.check(user, t0() + Duration::seconds(3)).is_ok());
        assert_eq!(table.expires_at(user), Some(t0() + Duration::seconds(6)));
    }

    #[test]
    fn test_users_are_independent() {
        let table = table();
        table.check(UserId(1), t0()).unwrap();
        assert!(table.check(UserId(2), t0()).is_ok());
        assert!(table.check(UserId(1), t0()).is_err());
        assert_eq!(table.expires_at(UserId(2)), Some(t0() + Duration::seconds(3)));
        assert_eq!(table.expires_at(UserId(3)), None);
    }

    #[test]
    fn test_remaining_seconds_rounds_up() {
        let table = table();
        let user = UserId(7);
        table.check(user, t0()).unwrap();

        let err = table
            .check(user, t0() + Duration::milliseconds(500))
            .unwrap_err();
        assert_eq!(
            err,
            CooldownError::UserOnCooldown {
                user_id: user,
                remaining_seconds: 3
            }
        );

        let err = table.check(user, t0() + Duration::seconds(2)).unwrap_err();
        assert_eq!(
            err,
            CooldownError::UserOnCooldown {
                user_id: user,
                remaining_seconds: 1
            }
        );
    }

    #[test]
    fn test_huge_window_saturates_instead_of_overflowing() {
        let table = CooldownTable::new(std::time::Duration::from_secs(10_000_000_000_000));
        let user = UserId(1);

        assert!(table.check(user, Utc::now()).is_ok());
        assert_eq!(table.expires_at(user), Some(DateTime::<Utc>::MAX_UTC));
        assert!(table.check(user, Utc::now()).is_err());
    }
}
