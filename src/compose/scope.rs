use super::path::ActionPath;
use crate::dependencies::Dependencies;
use crate::effect::Effect;
use crate::mvi::{Action, FeatureState, Reducer};

/// Runs a child reducer on a slice of the parent state.
///
/// Parent actions that do not match the path are ignored, and the child only
/// ever sees its own slice, so every other parent field stays untouched.
pub struct Scope<PS, PA, C: Reducer> {
    state: fn(&mut PS) -> &mut C::State,
    action: ActionPath<PA, C::Action>,
    child: C,
}

impl<PS, PA, C: Reducer> Scope<PS, PA, C> {
    pub fn new(
        state: fn(&mut PS) -> &mut C::State,
        action: ActionPath<PA, C::Action>,
        child: C,
    ) -> Self {
        Self {
            state,
            action,
            child,
        }
    }
}

impl<PS, PA, C> Reducer for Scope<PS, PA, C>
where
    PS: FeatureState,
    PA: Action,
    C: Reducer,
{
    type State = PS;
    type Action = PA;

    fn reduce(&self, state: &mut PS, action: PA, deps: &Dependencies) -> Effect<PA> {
        let Some(child_action) = self.action.extract(&action) else {
            return Effect::none();
        };
        let child_state = (self.state)(state);
        self.child
            .reduce(child_state, child_action, deps)
            .map(self.action.embedder())
    }
}
