//! Login feature presenting the two-factor feature.

use std::sync::Arc;
use std::time::Duration;

use flowstate::{
    Action, ActionPath, Dependencies, Effect, FeatureState, PresentationAction, Presents, Reducer,
    ReducerExt,
};

use super::auth::{AuthenticationClient, AuthenticationResult, LoginRequest};
use super::two_factor::{AlertState, TwoFactorAction, TwoFactorReducer, TwoFactorState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub is_form_valid: bool,
    pub is_login_request_in_flight: bool,
    pub alert: Option<AlertState>,
    pub two_factor: Option<TwoFactorState>,
}

impl FeatureState for LoginState {}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginAction {
    AlertDismissed,
    EmailChanged(String),
    PasswordChanged(String),
    LoginButtonTapped,
    LoginResponse(AuthenticationResult),
    TwoFactor(PresentationAction<TwoFactorAction>),
}

impl Action for LoginAction {}

pub struct LoginCore;

impl Reducer for LoginCore {
    type State = LoginState;
    type Action = LoginAction;

    fn reduce(
        &self,
        state: &mut LoginState,
        action: LoginAction,
        deps: &Dependencies,
    ) -> Effect<LoginAction> {
        match action {
            LoginAction::AlertDismissed => {
                state.alert = None;
                Effect::none()
            }
            LoginAction::EmailChanged(email) => {
                state.email = email;
                state.is_form_valid = !state.email.is_empty() && !state.password.is_empty();
                Effect::none()
            }
            LoginAction::PasswordChanged(password) => {
                state.password = password;
                state.is_form_valid = !state.email.is_empty() && !state.password.is_empty();
                Effect::none()
            }
            LoginAction::LoginButtonTapped => {
                state.is_login_request_in_flight = true;
                let client = deps.get::<AuthenticationClient>();
                let scheduler = Arc::clone(&deps.scheduler);
                let request = LoginRequest {
                    email: state.email.clone(),
                    password: state.password.clone(),
                };
                Effect::future(async move {
                    let response = (client.login)(request).await;
                    scheduler.sleep(Duration::ZERO).await;
                    LoginAction::LoginResponse(response)
                })
            }
            LoginAction::LoginResponse(Ok(response)) => {
                state.is_login_request_in_flight = false;
                if response.two_factor_required {
                    state.two_factor = Some(TwoFactorState::new(response.token));
                }
                Effect::none()
            }
            LoginAction::LoginResponse(Err(error)) => {
                state.alert = Some(AlertState {
                    title: error.to_string(),
                });
                state.is_login_request_in_flight = false;
                Effect::none()
            }
            LoginAction::TwoFactor(_) => Effect::none(),
        }
    }
}

fn two_factor_state(state: &mut LoginState) -> &mut Option<TwoFactorState> {
    &mut state.two_factor
}

fn two_factor_action(action: &LoginAction) -> Option<PresentationAction<TwoFactorAction>> {
    match action {
        LoginAction::TwoFactor(action) => Some(action.clone()),
        _ => None,
    }
}

pub fn login_reducer() -> Presents<LoginCore, TwoFactorReducer> {
    LoginCore.presents(
        two_factor_state,
        ActionPath::new(two_factor_action, LoginAction::TwoFactor),
        TwoFactorReducer,
    )
}
