//! Wiring of configuration, stores and adapters

use std::sync::Arc;

use anyhow::{Context, anyhow};
use application::VisitPlanner;
use infrastructure::{
    AppConfig, ArtifactRenderer, CaseDataAdapter, ConnectionPool, FoursquareAdapter,
    RegionResolverAdapter, SqliteCredentialStore, SqliteRequestStore, create_pool,
};
use integration_regions::AreaTable;
use tracing::{debug, info};

/// Validated configuration with an open database
pub struct App {
    config: AppConfig,
    pool: Arc<ConnectionPool>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("database", &self.config.database.path)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Validate the configuration, open the database and fill in stored
    /// credentials
    pub async fn open(mut config: AppConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {e}"))?;

        let pool = Arc::new(create_pool(&config.database).with_context(|| {
            format!("Failed to open database {}", config.database.path)
        })?);

        let store = SqliteCredentialStore::new(Arc::clone(&pool));
        config.resolve_credentials(&store).await;

        Ok(Self { config, pool })
    }

    pub fn history(&self) -> SqliteRequestStore {
        SqliteRequestStore::new(Arc::clone(&self.pool))
    }

    pub fn credentials(&self) -> SqliteCredentialStore {
        SqliteCredentialStore::new(Arc::clone(&self.pool))
    }

    /// Build the planner with live adapters
    pub fn planner(&self, render: bool) -> anyhow::Result<VisitPlanner> {
        let retry = self.config.retry.clone();

        let venues = Arc::new(FoursquareAdapter::from_config(
            &self.config.foursquare,
            retry.clone(),
        )?);

        let table = AreaTable::from_path(&self.config.regions.area_table).with_context(|| {
            format!(
                "Failed to load area table {}",
                self.config.regions.area_table.display()
            )
        })?;
        debug!(rows = table.len(), "Area table ready");

        let regions = Arc::new(RegionResolverAdapter::from_config(
            &self.config.geocoding,
            Arc::new(table),
            retry.clone(),
        )?);
        let case_data = Arc::new(CaseDataAdapter::from_config(&self.config.case_data, retry)?);

        let mut planner = VisitPlanner::new(
            venues.clone(),
            venues,
            regions,
            case_data,
            Arc::new(self.history()),
        )
        .with_filter(self.config.filter.to_filter())
        .with_hours_concurrency(self.config.planner.hours_concurrency);

        if render && self.config.output.render {
            planner = planner.with_renderer(Arc::new(ArtifactRenderer::new(
                &self.config.output.directory,
            )?));
        }

        info!(?planner, "Planner ready");
        Ok(planner)
    }
}

#[cfg(test)]
mod tests {
    use application::ports::{CredentialStorePort, RequestHistoryPort};
    use domain::ApiCredential;
    use infrastructure::DatabaseConfig;

    use super::*;

    fn memory_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig::in_memory(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn open_rejects_invalid_config() {
        let mut config = memory_config();
        config.planner.hours_concurrency = 0;
        let err = App::open(config).await.unwrap_err();
        assert!(err.to_string().contains("hours_concurrency"));
    }

    #[tokio::test]
    async fn planner_requires_credentials() {
        let app = App::open(memory_config()).await.unwrap();
        let err = app.planner(false).unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    fn with_credentials(mut config: AppConfig) -> AppConfig {
        config.foursquare.client_id = Some("id".to_string());
        config.foursquare.client_secret = Some("secret".to_string().into());
        config.geocoding.api_key = Some("key".to_string().into());
        config
    }

    #[tokio::test]
    async fn stored_credentials_are_resolved_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let database = DatabaseConfig {
            path: dir.path().join("quietspot.db").display().to_string(),
            ..DatabaseConfig::default()
        };
        let config = AppConfig {
            database,
            ..AppConfig::default()
        };

        let app = App::open(config.clone()).await.unwrap();
        app.credentials()
            .add_credential(&ApiCredential::with_client_secret("foursquare", "id", "secret").unwrap())
            .await
            .unwrap();
        drop(app);

        let app = App::open(config).await.unwrap();
        assert!(app.config.foursquare.has_credentials());
        assert!(!app.config.geocoding.has_api_key());
    }

    #[tokio::test]
    async fn planner_needs_area_table() {
        let mut config = with_credentials(memory_config());
        config.regions.area_table = "does/not/exist.csv".into();
        let app = App::open(config).await.unwrap();

        let err = app.planner(false).unwrap_err();
        assert!(err.to_string().contains("area table"));
    }

    #[tokio::test]
    async fn planner_builds_with_table_and_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("areas.csv");
        std::fs::write(&table, "GEN,BEZ,googlemaps_key\nBerlin Mitte,Bezirk,Mitte\n").unwrap();

        let mut config = with_credentials(memory_config());
        config.regions.area_table = table;
        config.output.directory = dir.path().join("out");

        let app = App::open(config).await.unwrap();
        assert!(app.planner(true).is_ok());
        assert!(app.history().recent_requests(5).await.unwrap().is_empty());
    }
}
