//! # EventPass Testing
//!
//! Testing utilities and helpers for the EventPass reducer architecture.
//!
//! This crate provides:
//! - Deterministic `Clock` implementations
//! - `ReducerTest`, a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use eventpass_testing::{assertions, test_clock, ReducerTest};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(CartEnvironment::new(Arc::new(test_clock()), catalog))
//!     .given_state(CartState::new())
//!     .when_action(CartAction::AddToCart { event_id, quantity: 2 })
//!     .then_state(|state| assert_eq!(state.cart_count(), 2))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use eventpass_core::environment::Clock;


pub use reducer_test::{assertions, ReducerOutcome, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use eventpass_testing::mocks::FixedClock;
    /// use eventpass_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
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

    /// Clock that moves forward by a fixed step every time it is read
    ///
    /// Useful when a test needs distinct, ordered timestamps (first add vs.
    /// a later quantity merge).
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` and advancing by `step` per read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            // A poisoned lock only means another test thread panicked mid-read
            let mut next = match self.next.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, SteppingClock};
