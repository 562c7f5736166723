use crate::dependencies::Dependencies;
use crate::effect::Effect;
use crate::mvi::Reducer;

/// Two reducers run one after the other. See [`ReducerExt::combine`].
///
/// [`ReducerExt::combine`]: super::ReducerExt::combine
pub struct Combined<A, B> {
    first: A,
    second: B,
}

impl<A, B> Combined<A, B> {
    pub(super) fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Reducer for Combined<A, B>
where
    A: Reducer,
    B: Reducer<State = A::State, Action = A::Action>,
{
    type State = A::State;
    type Action = A::Action;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        deps: &Dependencies,
    ) -> Effect<Self::Action> {
        let first = self.first.reduce(state, action.clone(), deps);
        let second = self.second.reduce(state, action, deps);
        first.merge_with(second)
    }
}
