use crate::DeribitClient;
use crate::error::{Error, Result};
use crate::models::AuthGrant;
use crate::requests::{PublicAuthGrantType, PublicAuthRequest};
use chrono::Utc;
use std::env;

/// API key pair used for the `client_credentials` grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads `DERIBIT_CLIENT_ID` and `DERIBIT_CLIENT_SECRET`, loading a `.env`
    /// file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let read = |key: &str| {
            env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::ConfigError(format!("{key} is not set")))
        };
        Ok(Self::new(
            read("DERIBIT_CLIENT_ID")?,
            read("DERIBIT_CLIENT_SECRET")?,
        ))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds.
    pub expires_in: u64,
    pub scope: String,
    pub issued_at_millis: i64,
}

impl Session {
    pub fn from_grant(grant: AuthGrant, issued_at_millis: i64) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_in: grant.expires_in,
            scope: grant.scope,
            issued_at_millis,
        }
    }

    pub fn expires_at_millis(&self) -> i64 {
        let lifetime = i64::try_from(self.expires_in.saturating_mul(1000)).unwrap_or(i64::MAX);
        self.issued_at_millis.saturating_add(lifetime)
    }

    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at_millis()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("issued_at_millis", &self.issued_at_millis)
            .finish()
    }
}

impl DeribitClient {
    /// Exchanges `credentials` for a token pair and stores the resulting
    /// session for later private calls, replacing any previous one.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let now = Utc::now().timestamp_millis();
        let grant = self
            .call(PublicAuthRequest {
                grant_type: PublicAuthGrantType::ClientCredentials,
                client_id: Some(credentials.client_id.clone()),
                client_secret: Some(credentials.client_secret.clone()),
                timestamp: Some(now),
                ..Default::default()
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "authentication failed"))?;
        Ok(self.store_session(Session::from_grant(grant, now)).await)
    }

    /// Trades the current refresh token for a new session. Never runs on its
    /// own; callers decide when a session is due.
    pub async fn refresh_session(&self) -> Result<Session> {
        let current = self.session().await.ok_or(Error::NotAuthenticated)?;
        let now = Utc::now().timestamp_millis();
        let grant = self
            .call(PublicAuthRequest {
                grant_type: PublicAuthGrantType::RefreshToken,
                refresh_token: Some(current.refresh_token),
                ..Default::default()
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "session refresh failed"))?;
        Ok(self.store_session(Session::from_grant(grant, now)).await)
    }

    async fn store_session(&self, session: Session) -> Session {
        tracing::info!(
            scope = %session.scope,
            expires_in = session.expires_in,
            "session established"
        );
        *self.session.write().await = Some(session.clone());
        session
    }
}
