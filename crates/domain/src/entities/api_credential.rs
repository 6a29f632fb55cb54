//! Stored API credentials

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Credentials for one external provider
///
/// A provider authenticates either with a single API key or with a client
/// id / client secret pair. Rows are append-only; the newest row per
/// provider is the one in effect.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredential {
    provider: String,
    api_key: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    created_at: DateTime<Utc>,
}

impl ApiCredential {
    /// Credential with a single API key
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a blank provider or key.
    pub fn with_api_key(
        provider: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(provider, Some(api_key.into()), None, None)
    }

    /// Credential with a client id / client secret pair
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a blank provider, id or
    /// secret.
    pub fn with_client_secret(
        provider: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(
            provider,
            None,
            Some(client_id.into()),
            Some(client_secret.into()),
        )
    }

    /// Create a credential from its parts
    ///
    /// At least the API key or the complete client pair must be present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the provider is blank, a
    /// present value is blank, only half of the client pair is given, or no
    /// credential is given at all.
    pub fn new(
        provider: impl Into<String>,
        api_key: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self, DomainError> {
        let provider = provider.into().trim().to_lowercase();
        if provider.is_empty() {
            return Err(DomainError::ValidationError(
                "provider must not be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("api_key", &api_key),
            ("client_id", &client_id),
            ("client_secret", &client_secret),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(DomainError::ValidationError(format!(
                    "{name} must not be blank"
                )));
            }
        }

        if client_id.is_some() != client_secret.is_some() {
            return Err(DomainError::ValidationError(
                "client_id and client_secret must be given together".to_string(),
            ));
        }
        if api_key.is_none() && client_id.is_none() {
            return Err(DomainError::ValidationError(format!(
                "no credential given for provider {provider}"
            )));
        }

        Ok(Self {
            provider,
            api_key,
            client_id,
            client_secret,
            created_at: Utc::now(),
        })
    }

    /// Restore a credential loaded from storage
    #[must_use]
    pub const fn restore(
        provider: String,
        api_key: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            provider,
            api_key,
            client_id,
            client_secret,
            created_at,
        }
    }

    /// Provider name, lower case
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("has_api_key", &self.api_key.is_some())
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
