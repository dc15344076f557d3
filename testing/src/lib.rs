//! # Todo List Testing
//!
//! Testing utilities for the todo list service.
//!
//! This crate provides:
//! - Deterministic clocks
//! - In-memory implementations of the repository traits
//! - Fixtures that build a ready-to-use [`TodoService`]
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_testing::fixtures::{hint, service_with_users, titled};
//!
//! #[tokio::test]
//! async fn creates_a_todo() {
//!     let (service, _clock) = service_with_users(&["alice"]);
//!     let alice = service.resolve_identity(&hint("alice")).await.unwrap();
//!     let todo = service.create_todo(&alice, titled("Buy milk")).await.unwrap();
//!     assert_eq!(todo.title, "Buy milk");
//! }
//! ```

use chrono::{DateTime, Utc};
use todo_list_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_list_testing::mocks::FixedClock;
    /// use todo_list_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the service.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Start at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Midnight, 2025-01-01 UTC.
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }
}

pub mod fixtures;
pub mod repositories;

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use repositories::{InMemoryTodoRepository, InMemoryUserRepository};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(mocks::epoch());
        let handle = clock.clone();
        handle.advance(Duration::seconds(5));
        assert_eq!(clock.now(), mocks::epoch() + Duration::seconds(5));
    }
}
