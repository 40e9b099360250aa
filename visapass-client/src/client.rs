/// HTTP client for the VisaPass API
///
/// Wraps the user endpoints the front ends call after external sign-in.
/// Every call is a single attempt: no retries, no caching. The session token
/// is held behind a `RwLock` and attached as a bearer token when set.
///
/// # Example
///
/// ```no_run
/// use visapass_client::client::{ApiClient, SyncUserPayload};
/// use visapass_client::config::ClientConfig;
///
/// # async fn example() -> Result<(), visapass_client::error::ClientError> {
/// let client = ApiClient::new(ClientConfig::from_env()?)?;
/// client.set_token("eyJ...").await;
///
/// let user = client
///     .sync_user(&SyncUserPayload {
///         firebase_uid: "firebase-uid-1".to_string(),
///         email: "ada@example.com".to_string(),
///         full_name: "Ada Traveller".to_string(),
///         passport_country: None,
///     })
///     .await?;
/// println!("{} is {:?}", user.email, user.status);
/// # Ok(())
/// # }
/// ```

use crate::{config::ClientConfig, error::ClientError};
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use visapass_shared::models::user::UserStatus;

/// Status as reported by the server
///
/// Statuses this client version does not know are kept verbatim instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileStatus {
    Known(UserStatus),
    Unrecognized(String),
}

impl ProfileStatus {
    pub fn is_profile_complete(&self) -> bool {
        matches!(self, ProfileStatus::Known(UserStatus::ProfileComplete))
    }
}

/// User as returned by `POST /users` and `GET /users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub auth_user_id: String,
    pub email: String,
    pub full_name: String,
    pub passport_country: Option<String>,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of the sync call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserPayload {
    pub firebase_uid: String,
    pub email: String,
    pub full_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_country: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// VisaPass API client
///
/// Cheap to clone; clones share the session token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a client for the configured API
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stores the identity token sent with subsequent requests
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Forgets the session token
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Creates or re-syncs the signed-in user (`POST /users`)
    pub async fn sync_user(&self, payload: &SyncUserPayload) -> Result<UserProfile, ClientError> {
        let request = self.request(Method::POST, "/users").await.json(payload);
        self.send_json(request).await
    }

    /// Fetches the signed-in user (`GET /users/me`)
    pub async fn fetch_current_user(&self) -> Result<UserProfile, ClientError> {
        let request = self.request(Method::GET, "/users/me").await;
        self.send_json(request).await
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.json::<T>().await?)
    }
}

async fn status_error(response: Response) -> ClientError {
    let status = response.status();
    let fallback = status.canonical_reason().unwrap_or("Request failed").to_string();

    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(fallback),
        Err(_) => fallback,
    };

    tracing::debug!(%status, %message, "API request rejected");
    ClientError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_status_known_and_unknown() {
        let known: ProfileStatus = serde_json::from_str("\"PROFILE_COMPLETE\"").unwrap();
        assert_eq!(known, ProfileStatus::Known(UserStatus::ProfileComplete));
        assert!(known.is_profile_complete());

        let unknown: ProfileStatus = serde_json::from_str("\"VERIFIED\"").unwrap();
        assert_eq!(unknown, ProfileStatus::Unrecognized("VERIFIED".to_string()));
        assert!(!unknown.is_profile_complete());
    }

    #[test]
    fn test_sync_payload_wire_format() {
        let payload = SyncUserPayload {
            firebase_uid: "uid-1".to_string(),
            email: "ada@example.com".to_string(),
            full_name: "Ada".to_string(),
            passport_country: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["firebaseUid"], "uid-1");
        assert_eq!(json["fullName"], "Ada");
        assert!(json.get("passportCountry").is_none());
    }

    #[tokio::test]
    async fn test_token_lifecycle_shared_between_clones() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        let clone = client.clone();

        client.set_token("abc").await;
        assert!(clone.has_token().await);

        clone.clear_token().await;
        assert!(!client.has_token().await);
    }
}
