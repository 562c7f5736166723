//! Debounced search feature.

use std::sync::Arc;
use std::time::Duration;

use flowstate::{Action, Dependencies, Effect, FeatureState, Reducer};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<String>,
    pub is_searching: bool,
}

impl FeatureState for SearchState {}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    QueryChanged(String),
    SearchResponse(Vec<String>),
    CancelTapped,
}

impl Action for SearchAction {}

/// Looks queries up in a fixed word list after the user stops typing.
pub struct SearchReducer {
    pub words: Vec<&'static str>,
}

impl Reducer for SearchReducer {
    type State = SearchState;
    type Action = SearchAction;

    fn reduce(
        &self,
        state: &mut SearchState,
        action: SearchAction,
        deps: &Dependencies,
    ) -> Effect<SearchAction> {
        match action {
            SearchAction::QueryChanged(query) => {
                state.query = query.clone();
                if query.is_empty() {
                    state.results.clear();
                    state.is_searching = false;
                    return Effect::cancel("search");
                }
                state.is_searching = true;
                let results: Vec<String> = self
                    .words
                    .iter()
                    .filter(|word| word.starts_with(query.as_str()))
                    .map(|word| word.to_string())
                    .collect();
                Effect::send(SearchAction::SearchResponse(results)).debounce(
                    "search",
                    SEARCH_DEBOUNCE,
                    Arc::clone(&deps.scheduler),
                )
            }
            SearchAction::SearchResponse(results) => {
                state.results = results;
                state.is_searching = false;
                Effect::none()
            }
            SearchAction::CancelTapped => {
                state.is_searching = false;
                Effect::cancel("search")
            }
        }
    }
}
