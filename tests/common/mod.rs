//! Shared test features and helpers.

#![allow(dead_code, unused_imports)]

pub mod auth;
pub mod login;
pub mod search;
pub mod two_factor;

use flowstate::{Dependencies, ImmediateScheduler};
use std::sync::Arc;

pub use auth::{AuthenticationClient, AuthenticationError, AuthenticationResponse};
pub use login::{login_reducer, LoginAction, LoginState};
pub use search::{SearchAction, SearchReducer, SearchState, SEARCH_DEBOUNCE};
pub use two_factor::{AlertState, TwoFactorAction, TwoFactorReducer, TwoFactorState};

pub const TOKEN: &str = "deadbeefdeadbeef";

/// Effects scheduled on the main scheduler run without advancing the clock.
pub fn immediate(deps: &mut Dependencies) {
    deps.scheduler = Arc::new(ImmediateScheduler);
}

/// Successful authentication response carrying [`TOKEN`].
pub fn authenticated(two_factor_required: bool) -> AuthenticationResponse {
    AuthenticationResponse {
        token: TOKEN.to_string(),
        two_factor_required,
    }
}
