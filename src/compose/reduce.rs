use std::marker::PhantomData;

use crate::dependencies::Dependencies;
use crate::effect::Effect;
use crate::mvi::{Action, FeatureState, Reducer};

/// Reducer built from a closure.
pub struct Reduce<S, A, F> {
    reduce: F,
    _marker: PhantomData<fn(&mut S, A)>,
}

impl<S, A, F> Reduce<S, A, F>
where
    F: Fn(&mut S, A, &Dependencies) -> Effect<A> + Send + Sync + 'static,
{
    pub fn new(reduce: F) -> Self {
        Self {
            reduce,
            _marker: PhantomData,
        }
    }
}

impl<S, A, F> Reducer for Reduce<S, A, F>
where
    S: FeatureState,
    A: Action,
    F: Fn(&mut S, A, &Dependencies) -> Effect<A> + Send + Sync + 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut S, action: A, deps: &Dependencies) -> Effect<A> {
        (self.reduce)(state, action, deps)
    }
}
