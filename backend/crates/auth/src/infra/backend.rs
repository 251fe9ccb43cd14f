//! HTTP Login Gateway
//!
//! [`LoginGateway`] over the blood-bank REST API.

use platform::client::{ClientError, RestClient};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::login_grant::LoginGrant;
use crate::domain::gateway::{Credentials, LoginGateway, Registration, RegistrationReceipt};
use crate::error::{AuthError, AuthResult};

const LOGIN_ENDPOINT: &str = "/login/";
const REGISTER_ENDPOINT: &str = "/customers/";

#[derive(Debug, Clone)]
pub struct HttpLoginGateway {
    client: RestClient,
}

impl HttpLoginGateway {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let client = RestClient::new(config.backend_api_url.clone(), config.backend_timeout)
            .map_err(AuthError::Backend)?;
        Ok(Self { client })
    }
}

#[derive(Serialize)]
struct LoginRequestBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponseBody {
    #[serde(default, alias = "access_token")]
    access: Option<String>,
    #[serde(default)]
    user_type: Option<String>,
}

impl LoginResponseBody {
    fn into_grant(self) -> AuthResult<LoginGrant> {
        LoginGrant::from_wire(self.access, self.user_type)
    }
}

#[derive(Serialize)]
struct RegisterRequestBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl LoginGateway for HttpLoginGateway {
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<LoginGrant> {
        let body = LoginRequestBody {
            email: credentials.email.as_str(),
            password: &credentials.password,
        };

        let response: LoginResponseBody = self
            .client
            .post_json(LOGIN_ENDPOINT, &body)
            .await
            .map_err(map_login_error)?;

        response.into_grant()
    }

    async fn register(&self, registration: &Registration) -> AuthResult<RegistrationReceipt> {
        let body = RegisterRequestBody {
            name: &registration.name,
            email: registration.email.as_str(),
            password: &registration.password,
        };

        let result: Result<serde_json::Value, ClientError> =
            self.client.post_json(REGISTER_ENDPOINT, &body).await;

        match result {
            Ok(value) => Ok(RegistrationReceipt {
                message: value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
            }),
            // 2xx with an empty or non-JSON body still created the account
            Err(ClientError::Decode(e)) => {
                tracing::debug!(error = %e, "Registration response had no JSON body");
                Ok(RegistrationReceipt::default())
            }
            Err(e) => Err(map_rejection(e, "Registration failed")),
        }
    }
}

fn map_login_error(err: ClientError) -> AuthError {
    match err {
        ClientError::Decode(e) => {
            tracing::debug!(error = %e, "Login response did not decode");
            AuthError::MalformedLoginResponse
        }
        other => map_rejection(other, "Login failed"),
    }
}

fn map_rejection(err: ClientError, fallback: &str) -> AuthError {
    match err {
        ClientError::Status { status, message } => AuthError::BackendRejected {
            status,
            message: message.unwrap_or_else(|| fallback.to_string()),
        },
        other => AuthError::Backend(other),
    }
}
