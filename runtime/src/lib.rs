//! # EventPass Runtime
//!
//! The Store runtime that coordinates reducer execution, effect handling and
//! change notification.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Feedback loop**: `Effect::Dispatch` actions are queued and reduced in order
//! - **Subscribers**: Every processed action is broadcast to observers
//!
//! The store is synchronous. `send` runs the whole action → reducer →
//! effects → action loop to completion on the calling thread, so a UI event
//! loop can call it directly. Mutation takes `&mut self`: there is exactly one
//! owner and one writer, and the store is passed to whoever needs it instead of
//! living in a global.
//!
//! ## Example
//!
//! ```ignore
//! use eventpass_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//! let mut updates = store.subscribe_actions();
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//!
//! // Observe what happened
//! while let Ok(action) = updates.try_recv() {
//!     println!("{action:?}");
//! }
//! ```

use eventpass_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use tokio::sync::broadcast;

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A single `send` produced more feedback actions than allowed
        ///
        /// This almost always means two actions dispatch each other forever.
        /// Actions reduced before the limit was hit remain applied.
        #[error("Dispatch limit of {0} actions exceeded in a single send")]
        DispatchLimitExceeded(usize),
    }
}

/// Default capacity of the subscriber channel
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Default limit on actions reduced by one `send` call
pub const DEFAULT_DISPATCH_LIMIT: usize = 64;

/// The Store - runtime coordinator for a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    dispatch_limit: usize,
    /// Every action the reducer processes, in processing order.
    ///
    /// Receivers that fall more than the channel capacity behind observe
    /// `TryRecvError::Lagged` and skip ahead; they are notification hints,
    /// and current values are always read from the store itself.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: Clone + std::fmt::Debug,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses a subscriber capacity of [`DEFAULT_BROADCAST_CAPACITY`].
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(
            initial_state,
            reducer,
            environment,
            DEFAULT_BROADCAST_CAPACITY,
        )
    }

    /// Create a new store with a custom subscriber capacity
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity.max(1));

        Self {
            state: initial_state,
            reducer,
            environment,
            dispatch_limit: DEFAULT_DISPATCH_LIMIT,
            action_broadcast,
        }
    }

    /// Override the number of actions a single `send` may reduce
    #[must_use]
    pub fn with_dispatch_limit(mut self, limit: usize) -> Self {
        self.dispatch_limit = limit.max(1);
        self
    }

    /// Send an action to the store
    ///
    /// The action is reduced, subscribers are notified, and any
    /// `Effect::Dispatch` actions it produced are reduced in turn (breadth
    /// first, in the order the effects were returned). Subscribers only ever
    /// see an action after its state change has been fully applied.
    ///
    /// Returns the number of actions reduced, including feedback actions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DispatchLimitExceeded`] if the feedback loop
    /// produces more actions than the configured limit.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
        let mut queue = VecDeque::from([action]);
        let mut processed = 0;

        while let Some(action) = queue.pop_front() {
            if processed == self.dispatch_limit {
                tracing::warn!(limit = self.dispatch_limit, "Dispatch limit exceeded");
                metrics::counter!("store.dispatch_limit.exceeded").increment(1);
                return Err(StoreError::DispatchLimitExceeded(self.dispatch_limit));
            }

            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer
                    .reduce(&mut self.state, action.clone(), &self.environment)
            };
            processed += 1;

            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            // No receivers is the common case before the UI subscribes
            let _ = self.action_broadcast.send(action);

            for effect in effects {
                Self::collect_dispatches(effect, &mut queue);
            }
        }

        tracing::debug!(processed, "Action processing completed");
        Ok(processed)
    }

    fn collect_dispatches(effect: Effect<A>, queue: &mut VecDeque<A>) {
        match effect {
            Effect::None => {},
            Effect::Sequential(effects) => {
                for effect in effects {
                    Self::collect_dispatches(effect, queue);
                }
            },
            Effect::Dispatch(action) => {
                tracing::trace!("Queueing dispatched action");
                queue.push_back(*action);
            },
        }
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let count = store.state(|s| s.cart_count());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Subscribe to every action the store processes
    ///
    /// Dropping the receiver unsubscribes. Receivers only see actions sent
    /// after they subscribed.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Number of live subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.action_broadcast.receiver_count()
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// Consume the store and return its final state
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }
}
