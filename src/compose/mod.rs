//! Reducer composition.
//!
//! Features are built from small reducers glued together:
//!
//! - [`Reduce`] turns a closure into a reducer
//! - [`ReducerExt::combine`] runs two reducers over the same state
//! - [`Scope`] runs a child reducer on a slice of the parent state
//! - [`ReducerExt::presents`] drives an optional child feature and tears
//!   its effects down on dismissal
//! - [`ReducerExt::log_changes`] traces actions and state diffs
//!
//! When a child and its parent both react to an action, put the child first
//! (`Scope::new(..).combine(parent)`) so the parent observes post-child state.

mod combine;
mod log_changes;
mod path;
mod presentation;
mod reduce;
mod scope;

pub use combine::Combined;
pub use log_changes::LogChanges;
pub use path::ActionPath;
pub use presentation::{PresentationAction, Presents};
pub use reduce::Reduce;
pub use scope::Scope;

use crate::effect::CancelId;
use crate::mvi::Reducer;

/// Combinator methods available on every reducer.
pub trait ReducerExt: Reducer + Sized {
    /// Run `self`, then `other`, on the same state and action.
    fn combine<R>(self, other: R) -> Combined<Self, R>
    where
        R: Reducer<State = Self::State, Action = Self::Action>,
    {
        Combined::new(self, other)
    }

    /// Embed an optional child feature driven by [`PresentationAction`]s.
    fn presents<C: Reducer>(
        self,
        state: fn(&mut Self::State) -> &mut Option<C::State>,
        action: ActionPath<Self::Action, PresentationAction<C::Action>>,
        child: C,
    ) -> Presents<Self, C> {
        Presents::new(self, state, action, child, CancelId::unique("presentation"))
    }

    /// Trace every action and the state diff it produced at `debug` level.
    fn log_changes(self, name: impl Into<String>) -> LogChanges<Self> {
        LogChanges::new(self, name.into())
    }
}

impl<R: Reducer> ReducerExt for R {}
