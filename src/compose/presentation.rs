use super::path::ActionPath;
use crate::dependencies::Dependencies;
use crate::effect::{CancelId, Effect};
use crate::mvi::{Action, Reducer};

/// Actions a parent uses to talk to an optionally presented child.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationAction<A> {
    /// An action for the child, if it is currently presented.
    Presented(A),
    /// Tear the child down. The parent sees this action before the child
    /// state is cleared.
    Dismiss,
}

impl<A: Action> Action for PresentationAction<A> {}

/// Parent reducer with an optional child feature. See
/// [`ReducerExt::presents`](super::ReducerExt::presents).
///
/// Every effect started by the child is registered under one cancel id;
/// whenever a reduction takes the child state from `Some` to `None` those
/// effects are cancelled.
pub struct Presents<P: Reducer, C: Reducer> {
    parent: P,
    child: C,
    state: fn(&mut P::State) -> &mut Option<C::State>,
    action: ActionPath<P::Action, PresentationAction<C::Action>>,
    cancel_id: CancelId,
}

impl<P: Reducer, C: Reducer> Presents<P, C> {
    pub(super) fn new(
        parent: P,
        state: fn(&mut P::State) -> &mut Option<C::State>,
        action: ActionPath<P::Action, PresentationAction<C::Action>>,
        child: C,
        cancel_id: CancelId,
    ) -> Self {
        Self {
            parent,
            child,
            state,
            action,
            cancel_id,
        }
    }

    fn reduce_child(
        &self,
        state: &mut P::State,
        child_action: C::Action,
        deps: &Dependencies,
    ) -> Effect<P::Action> {
        let Some(child_state) = (self.state)(state).as_mut() else {
            tracing::warn!(
                action = ?child_action,
                "presented action received while child state is absent"
            );
            return Effect::none();
        };
        let embed = self.action.embedder();
        self.child
            .reduce(child_state, child_action, deps)
            .map(move |action| embed(PresentationAction::Presented(action)))
            .cancellable(self.cancel_id.clone(), false)
    }
}

impl<P: Reducer, C: Reducer> Reducer for Presents<P, C> {
    type State = P::State;
    type Action = P::Action;

    fn reduce(
        &self,
        state: &mut P::State,
        action: P::Action,
        deps: &Dependencies,
    ) -> Effect<P::Action> {
        let was_presented = (self.state)(state).is_some();
        let mut dismiss = false;
        let child_effect = match self.action.extract(&action) {
            Some(PresentationAction::Presented(child_action)) => {
                self.reduce_child(state, child_action, deps)
            }
            Some(PresentationAction::Dismiss) => {
                dismiss = true;
                Effect::none()
            }
            None => Effect::none(),
        };

        let parent_effect = self.parent.reduce(state, action, deps);
        if dismiss {
            *(self.state)(state) = None;
        }

        let effect = child_effect.merge_with(parent_effect);
        if was_presented && (self.state)(state).is_none() {
            tracing::trace!(cancel_id = %self.cancel_id, "child dismissed, cancelling its effects");
            return effect.merge_with(Effect::cancel(self.cancel_id.clone()));
        }
        effect
    }
}
