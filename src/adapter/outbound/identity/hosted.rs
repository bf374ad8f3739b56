//! GoTrue-compatible hosted identity provider.
//!
//! Talks to the admin user endpoints with the service role key. The key
//! grants full control of the auth tenant, so it is read from the
//! environment only.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::domain::UserId;
use crate::error::{ConfigError, Error, IdentityError, Result};
use crate::port::outbound::identity::{Identity, IdentityMetadata, IdentityProvider, NewIdentity};

/// Environment variable holding the service role key.
pub const SERVICE_ROLE_KEY_ENV: &str = "STUDIODESK_SERVICE_ROLE_KEY";

const ADMIN_USERS_PATH: &str = "auth/v1/admin/users";

/// Admin client for a hosted auth service.
#[derive(Debug, Clone)]
pub struct HostedIdentity {
    client: Client,
    /// Base URL of the auth service, always ending in `/`.
    base: Url,
    service_key: String,
}

impl HostedIdentity {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(base_url: &str, service_key: impl Into<String>) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
            service_key: service_key.into(),
        })
    }

    /// Create a client reading the key from [`SERVICE_ROLE_KEY_ENV`].
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or the URL is invalid.
    pub fn from_env(base_url: &str) -> Result<Self> {
        let key = std::env::var(SERVICE_ROLE_KEY_ENV).map_err(|_| {
            Error::Config(ConfigError::MissingField {
                field: SERVICE_ROLE_KEY_ENV,
            })
        })?;
        Self::new(base_url, key)
    }

    fn users_url(&self) -> std::result::Result<Url, IdentityError> {
        self.base
            .join(ADMIN_USERS_PATH)
            .map_err(|e| IdentityError::Unavailable(e.to_string()))
    }

    fn user_url(&self, id: &UserId) -> std::result::Result<Url, IdentityError> {
        let mut url = self.users_url()?;
        url.path_segments_mut()
            .map_err(|()| IdentityError::Unavailable("base URL cannot be a base".into()))?
            .push(id.as_str());
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: &'a IdentityMetadata,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Error bodies differ between GoTrue versions; take whichever is present.
#[derive(Deserialize, Default)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self, status: StatusCode) -> String {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| format!("identity provider returned {status}"))
    }
}

async fn failure(response: reqwest::Response) -> IdentityError {
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    let message = body.into_message(status);
    if status == StatusCode::NOT_FOUND {
        IdentityError::NotFound(message)
    } else if status.is_client_error() {
        IdentityError::Rejected(message)
    } else {
        IdentityError::Unavailable(message)
    }
}

fn transport(err: reqwest::Error) -> IdentityError {
    IdentityError::Unavailable(err.to_string())
}

#[async_trait]
impl IdentityProvider for HostedIdentity {
    fn name(&self) -> &'static str {
        "hosted"
    }

    async fn create_identity(
        &self,
        request: &NewIdentity,
    ) -> std::result::Result<Identity, IdentityError> {
        let body = CreateUserRequest {
            email: &request.email,
            password: &request.password,
            email_confirm: true,
            user_metadata: &request.metadata,
        };
        let response = self
            .authorized(self.client.post(self.users_url()?))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let err = failure(response).await;
            warn!(email = %request.email, error = %err, "Identity creation refused");
            return Err(err);
        }

        let user: UserResponse = response.json().await.map_err(transport)?;
        debug!(user_id = %user.id, "Identity created");
        Ok(Identity {
            id: UserId::from(user.id),
            email: user.email.unwrap_or_else(|| request.email.clone()),
        })
    }

    async fn delete_identity(&self, id: &UserId) -> std::result::Result<(), IdentityError> {
        let response = self
            .authorized(self.client.delete(self.user_url(id)?))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        debug!(user_id = %id, "Identity deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusinessId, Role};

    #[test]
    fn urls_join_under_base_path() {
        let hosted = HostedIdentity::new("https://auth.example.com/tenant", "key").unwrap();
        assert_eq!(
            hosted.users_url().unwrap().as_str(),
            "https://auth.example.com/tenant/auth/v1/admin/users"
        );
        assert_eq!(
            hosted.user_url(&UserId::from("abc")).unwrap().as_str(),
            "https://auth.example.com/tenant/auth/v1/admin/users/abc"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HostedIdentity::new("not a url", "key"),
            Err(Error::Url(_))
        ));
    }

    #[test]
    fn create_request_confirms_email_and_carries_metadata() {
        let metadata = IdentityMetadata {
            first_name: "Ana".into(),
            last_name: "Rivera".into(),
            phone: None,
            role: Role::Student,
            business_id: BusinessId::from("b-1"),
        };
        let body = CreateUserRequest {
            email: "ana@example.com",
            password: "password1",
            email_confirm: true,
            user_metadata: &metadata,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["email_confirm"], true);
        assert_eq!(json["user_metadata"]["role"], "student");
        assert_eq!(json["user_metadata"]["business_id"], "b-1");
    }

    #[test]
    fn error_body_prefers_msg() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"msg":"User already registered","error":"x"}"#).unwrap();
        assert_eq!(
            body.into_message(StatusCode::UNPROCESSABLE_ENTITY),
            "User already registered"
        );
        assert_eq!(
            ErrorBody::default().into_message(StatusCode::BAD_GATEWAY),
            "identity provider returned 502 Bad Gateway"
        );
    }
}
