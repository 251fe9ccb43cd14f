//! Sign Up Use Case
//!
//! Registers a customer account with the backend. Does not log in.

use std::sync::Arc;

use crate::domain::gateway::{LoginGateway, Registration};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

const DEFAULT_MESSAGE: &str = "Registration successful";

pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct SignUpOutput {
    pub message: String,
}

pub struct SignUpUseCase<G>
where
    G: LoginGateway,
{
    gateway: Arc<G>,
}

impl<G> SignUpUseCase<G>
where
    G: LoginGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("Name cannot be empty".into()));
        }
        let email = Email::new(&input.email)?;
        if input.password.is_empty() {
            return Err(AuthError::InvalidInput("Password cannot be empty".into()));
        }

        let registration = Registration {
            name: name.to_string(),
            email,
            password: input.password,
        };

        let receipt = self.gateway.register(&registration).await?;

        tracing::info!(email = %registration.email, "Customer registered");

        Ok(SignUpOutput {
            message: receipt
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        })
    }
}
