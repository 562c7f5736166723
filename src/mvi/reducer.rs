//! Reducer trait for MVI architecture.

use super::action::Action;
use super::state::FeatureState;
use crate::dependencies::Dependencies;
use crate::effect::Effect;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It mutates
/// the state in place and describes follow-up work as an [`Effect`]; it never
/// performs that work itself. The output must be a deterministic function of
/// `(state, action, deps)`.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: FeatureState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Process an action, mutating the state and returning follow-up work.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        deps: &Dependencies,
    ) -> Effect<Self::Action>;
}
