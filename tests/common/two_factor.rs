//! Two-factor code entry feature.

use std::sync::Arc;
use std::time::Duration;

use flowstate::{Action, Dependencies, Effect, FeatureState, Reducer};

use super::auth::{AuthenticationClient, AuthenticationResult, TwoFactorRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TwoFactorState {
    pub token: String,
    pub code: String,
    pub is_form_valid: bool,
    pub is_two_factor_request_in_flight: bool,
    pub alert: Option<AlertState>,
}

impl TwoFactorState {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }
}

impl FeatureState for TwoFactorState {}

#[derive(Debug, Clone, PartialEq)]
pub enum TwoFactorAction {
    AlertDismissed,
    CodeChanged(String),
    SubmitButtonTapped,
    TwoFactorResponse(AuthenticationResult),
}

impl Action for TwoFactorAction {}

pub struct TwoFactorReducer;

impl Reducer for TwoFactorReducer {
    type State = TwoFactorState;
    type Action = TwoFactorAction;

    fn reduce(
        &self,
        state: &mut TwoFactorState,
        action: TwoFactorAction,
        deps: &Dependencies,
    ) -> Effect<TwoFactorAction> {
        match action {
            TwoFactorAction::AlertDismissed => {
                state.alert = None;
                Effect::none()
            }
            TwoFactorAction::CodeChanged(code) => {
                state.is_form_valid = code.len() >= 4;
                state.code = code;
                Effect::none()
            }
            TwoFactorAction::SubmitButtonTapped => {
                state.is_two_factor_request_in_flight = true;
                let client = deps.get::<AuthenticationClient>();
                let scheduler = Arc::clone(&deps.scheduler);
                let request = TwoFactorRequest {
                    code: state.code.clone(),
                    token: state.token.clone(),
                };
                Effect::future(async move {
                    let response = (client.two_factor)(request).await;
                    // Deliver on the main scheduler.
                    scheduler.sleep(Duration::ZERO).await;
                    TwoFactorAction::TwoFactorResponse(response)
                })
            }
            TwoFactorAction::TwoFactorResponse(Ok(_)) => {
                state.is_two_factor_request_in_flight = false;
                Effect::none()
            }
            TwoFactorAction::TwoFactorResponse(Err(error)) => {
                state.alert = Some(AlertState {
                    title: error.to_string(),
                });
                state.is_two_factor_request_in_flight = false;
                Effect::none()
            }
        }
    }
}
