//! Authentication client used by the login and two-factor features.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use flowstate::DependencyKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResponse {
    pub token: String,
    pub two_factor_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("invalid user or password")]
    InvalidUserPassword,
    #[error("invalid two factor")]
    InvalidTwoFactor,
    #[error("invalid intermediate token")]
    InvalidIntermediateToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorRequest {
    pub code: String,
    pub token: String,
}

pub type AuthenticationResult = Result<AuthenticationResponse, AuthenticationError>;
pub type AuthenticationFuture = Pin<Box<dyn Future<Output = AuthenticationResult> + Send>>;

#[derive(Clone)]
pub struct AuthenticationClient {
    pub login: Arc<dyn Fn(LoginRequest) -> AuthenticationFuture + Send + Sync>,
    pub two_factor: Arc<dyn Fn(TwoFactorRequest) -> AuthenticationFuture + Send + Sync>,
}

impl AuthenticationClient {
    /// Client whose endpoints panic when called.
    pub fn failing() -> Self {
        Self {
            login: Arc::new(|request: LoginRequest| -> AuthenticationFuture {
                panic!("unexpected login request: {:?}", request)
            }),
            two_factor: Arc::new(|request: TwoFactorRequest| -> AuthenticationFuture {
                panic!("unexpected two factor request: {:?}", request)
            }),
        }
    }

    pub fn with_login(mut self, result: AuthenticationResult) -> Self {
        self.login = Arc::new(move |_: LoginRequest| -> AuthenticationFuture {
            let result = result.clone();
            Box::pin(async move { result })
        });
        self
    }

    pub fn with_two_factor(mut self, result: AuthenticationResult) -> Self {
        self.two_factor = Arc::new(move |_: TwoFactorRequest| -> AuthenticationFuture {
            let result = result.clone();
            Box::pin(async move { result })
        });
        self
    }
}

impl DependencyKey for AuthenticationClient {
    fn default_value() -> Self {
        Self::failing()
    }
}
