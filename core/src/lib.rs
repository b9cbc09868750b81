//! # EventPass Core
//!
//! Core traits and types for the EventPass reducer architecture.
//!
//! Every piece of mutable application state (the discovery session, the cart)
//! is modelled as a reducer: a pure function from the current state and an
//! action to the next state plus a list of effect descriptions.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and the events they produce)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Follow-up work described as a value, executed by the store
//! - **Environment**: Injected dependencies (clock, catalog)
//!
//! ## Example
//!
//! ```
//! use eventpass_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct BadgeState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BadgeAction {
//!     Bump,
//! }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         action: BadgeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BadgeAction>; 4]> {
//!         match action {
//!             BadgeAction::Bump => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = BadgeState::default();
//! BadgeReducer.reduce(&mut state, BadgeAction::Bump, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce no follow-up work, so the effect list is
        /// inline-allocated for up to four entries.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. The store interprets them after the
/// reducer returns, on the same thread, before the next action is accepted.
pub mod effect {
    /// Effect type - describes follow-up work to be executed by the store
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action back into the reducer
        Dispatch(Box<Action>),
    }

    impl<Action> Effect<Action> {
        /// Feed `action` back into the reducer once the current action completes
        #[must_use]
        pub fn dispatch(action: Action) -> Self {
            Self::Dispatch(Box::new(action))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Self {
            Self::Sequential(effects)
        }

        /// Returns true if executing this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Self::None => true,
                Self::Sequential(effects) => effects.iter().all(Self::is_none),
                Self::Dispatch(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use eventpass_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn none_and_empty_chain_are_noops() {
        assert!(Effect::<u8>::None.is_none());
        assert!(Effect::<u8>::chain(vec![]).is_none());
        assert!(Effect::<u8>::chain(vec![Effect::None, Effect::None]).is_none());
    }

    #[test]
    fn dispatch_is_not_a_noop() {
        let effect = Effect::chain(vec![Effect::None, Effect::dispatch(7_u8)]);
        assert!(!effect.is_none());
        assert_eq!(Effect::dispatch(7_u8), Effect::Dispatch(Box::new(7)));
    }
}
