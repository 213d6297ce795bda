// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{self, Debug},
          sync::Arc};

use crate::FormResult;

/// Pure transition: `(&state, &action)` to a new state. It must not mutate anything it
/// was given.
pub type ReducerFn<S, A> = dyn Fn(&S, &A) -> FormResult<S> + Send + Sync;

/// Receives every new snapshot published by a [`Store`].
pub type SubscriberFn<S> = dyn Fn(&S) + Send + Sync;

pub type SubscriberVec<S> = Vec<(SubscriberId, Arc<SubscriberFn<S>>)>;

/// Handle returned by [`Store::subscribe`], used to [`Store::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(usize);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}

/// Synchronous store holding one immutable snapshot of `S`.
///
/// [`Store::dispatch`] runs the reducer, swaps in the new snapshot, and then runs every
/// subscriber with it, in subscription order. Subscribers only run when the new snapshot
/// differs from the last one they were shown.
pub struct Store<S, A>
where
    S: Clone + PartialEq + Debug,
{
    state: S,
    reducer: Arc<ReducerFn<S, A>>,
    subscriber_vec: SubscriberVec<S>,
    next_subscriber_id: usize,
    maybe_previous_state: Option<S>,
}

impl<S, A> Debug for Store<S, A>
where
    S: Clone + PartialEq + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscriber_vec.len())
            .finish_non_exhaustive()
    }
}

// Handle subscriber management.
impl<S, A> Store<S, A>
where
    S: Clone + PartialEq + Debug,
{
    pub fn new(
        initial_state: S,
        reducer: impl Fn(&S, &A) -> FormResult<S> + Send + Sync + 'static,
    ) -> Self {
        Self {
            maybe_previous_state: Some(initial_state.clone()),
            state: initial_state,
            reducer: Arc::new(reducer),
            subscriber_vec: Vec::new(),
            next_subscriber_id: 0,
        }
    }

    pub fn subscribe(
        &mut self,
        subscriber_fn: impl Fn(&S) + Send + Sync + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;
        self.subscriber_vec.push((id, Arc::new(subscriber_fn)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let len_before = self.subscriber_vec.len();
        self.subscriber_vec.retain(|(it, _)| *it != id);
        self.subscriber_vec.len() != len_before
    }

    pub fn clear_subscribers(&mut self) -> &mut Self {
        self.subscriber_vec.clear();
        self
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.subscriber_vec.len() }
}

// Handle dispatch.
impl<S, A> Store<S, A>
where
    S: Clone + PartialEq + Debug,
    A: Debug,
{
    #[must_use]
    pub fn get_state(&self) -> &S { &self.state }

    /// # Errors
    ///
    /// Whatever the reducer returns. On error the snapshot is left untouched and no
    /// subscriber runs.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, action: &A) -> FormResult<&S> {
        let new_state = (self.reducer)(&self.state, action)?;
        self.state = new_state;
        self.run_subscribers();
        Ok(&self.state)
    }

    fn has_state_changed(&self) -> bool {
        match &self.maybe_previous_state {
            Some(previous_state) => *previous_state != self.state,
            None => true,
        }
    }

    fn save_state_to_previous_state(&mut self) {
        self.maybe_previous_state = Some(self.state.clone());
    }

    /// Run these in sequence.
    fn run_subscribers(&mut self) {
        // Early return if state hasn't changed.
        if !self.has_state_changed() {
            tracing::trace!(message = "📭 state unchanged, subscribers skipped");
            return;
        }

        // Update previous state, for next time.
        self.save_state_to_previous_state();

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "📬 publishing new state",
            subscribers = %self.subscriber_vec.len()
        );

        for (_, subscriber_fn) in &self.subscriber_vec {
            subscriber_fn(&self.state);
        }
    }
}
