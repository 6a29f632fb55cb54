//! Credential store port

use async_trait::async_trait;
use domain::ApiCredential;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for stored provider credentials
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStorePort: Send + Sync {
    /// Append a credential row
    async fn add_credential(&self, credential: &ApiCredential) -> Result<(), ApplicationError>;

    /// Newest credential for a provider
    async fn latest_credential(
        &self,
        provider: &str,
    ) -> Result<Option<ApiCredential>, ApplicationError>;
}
