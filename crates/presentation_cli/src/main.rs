//! quietspot CLI
//!
//! Finds venues that are open and not crowded at a planned visit time.

#![allow(clippy::print_stdout)]

mod app;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use application::ports::{CredentialStorePort, RequestHistoryPort};
use application::{DEFAULT_RESULT_LIMIT, VisitRequestInput};
use clap::{Args, Parser, Subcommand};
use domain::{ApiCredential, VisitRequest};
use infrastructure::{AppConfig, init_logging};
use tracing::error;

use crate::app::App;

/// quietspot CLI
#[derive(Debug, Parser)]
#[command(name = "quietspot")]
#[command(author, version, about = "Find quiet venues for a planned visit", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./quietspot.toml if present)
    #[arg(short, long, global = true, env = "QUIETSPOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search venues and filter them by opening and popular hours
    ///
    /// Example: quietspot search --lat 52.52 --lng 13.405 --query coffee
    ///          --radius 1000 --at "2020-11-20 13:00:00"
    Search(SearchArgs),

    /// List recent requests with their case data and results
    History {
        /// Number of requests to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Manage stored API credentials
    #[command(subcommand)]
    Credentials(CredentialsCommand),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Request document (JSON with lat, lng, search_input, search_radius,
    /// datetime and optional limit)
    #[arg(long, conflicts_with_all = ["lat", "lng", "query", "radius", "at", "limit"])]
    request: Option<PathBuf>,

    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true, required_unless_present = "request")]
    lat: Option<f64>,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true, required_unless_present = "request")]
    lng: Option<f64>,

    /// Venue query, e.g. "coffee"
    #[arg(short, long, required_unless_present = "request")]
    query: Option<String>,

    /// Search radius in metres
    #[arg(short, long, required_unless_present = "request")]
    radius: Option<u32>,

    /// Visit time, "YYYY-MM-DD HH:MM:SS"
    #[arg(long, required_unless_present = "request")]
    at: Option<String>,

    /// Maximum number of venues to consider
    #[arg(short, long)]
    limit: Option<u16>,

    /// Skip writing the map and schedule chart
    #[arg(long)]
    no_render: bool,
}

impl SearchArgs {
    /// Raw request from the document or the flags
    fn to_input(&self) -> anyhow::Result<VisitRequestInput> {
        if let Some(path) = &self.request {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request {}", path.display()))?;
            return Ok(VisitRequestInput::from_json(&raw)?);
        }

        Ok(VisitRequestInput {
            lat: self.lat.context("--lat is required")?,
            lng: self.lng.context("--lng is required")?,
            search_input: self.query.clone().context("--query is required")?,
            search_radius: self.radius.context("--radius is required")?,
            datetime: self.at.clone().context("--at is required")?,
            limit: self.limit.unwrap_or(DEFAULT_RESULT_LIMIT),
        })
    }

    fn to_request(&self) -> anyhow::Result<VisitRequest> {
        Ok(self.to_input()?.validate()?)
    }
}

#[derive(Debug, Subcommand)]
enum CredentialsCommand {
    /// Store a credential; the newest one per provider is used
    ///
    /// Example: quietspot credentials add --provider google --key AIza...
    Add {
        /// Provider name ("foursquare" or "google")
        #[arg(short, long)]
        provider: String,

        /// API key
        #[arg(short, long)]
        key: Option<String>,

        /// OAuth client id
        #[arg(long, requires = "client_secret")]
        client_id: Option<String>,

        /// OAuth client secret
        #[arg(long, requires = "client_id")]
        client_secret: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging, cli.verbose)?;

    if let Err(e) = run(cli.command, config).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, config: AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Search(args) => {
            // reject bad input before any external call
            let request = args.to_request()?;
            let app = App::open(config).await?;
            let planner = app.planner(!args.no_render)?;
            let report = planner.plan(request).await?;
            print!("{}", output::format_report(&report));
        },

        Commands::History { limit } => {
            let app = App::open(config).await?;
            let history = app.history().recent_requests(limit).await?;
            print!("{}", output::format_history(&history));
        },

        Commands::Credentials(CredentialsCommand::Add {
            provider,
            key,
            client_id,
            client_secret,
        }) => {
            let credential = ApiCredential::new(provider, key, client_id, client_secret)?;
            let app = App::open(config).await?;
            app.credentials().add_credential(&credential).await?;
            println!("🔐 Stored credential for {}", credential.provider());
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("quietspot").chain(args.iter().copied()))
    }

    fn search_args(cli: Cli) -> SearchArgs {
        match cli.command {
            Commands::Search(args) => args,
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn search_from_flags() {
        let cli = parse(&[
            "search", "--lat", "52.52", "--lng", "-0.12", "--query", "coffee", "--radius", "800",
            "--at", "2020-11-20 13:00:00",
        ])
        .unwrap();
        let args = search_args(cli);
        assert!(!args.no_render);

        let input = args.to_input().unwrap();
        assert!((input.lng + 0.12).abs() < 1e-9);
        assert_eq!(input.search_radius, 800);
        assert_eq!(input.limit, DEFAULT_RESULT_LIMIT);

        let request = args.to_request().unwrap();
        assert_eq!(request.query(), "coffee");
    }

    #[test]
    fn search_requires_flags_or_document() {
        assert!(parse(&["search", "--lat", "52.5"]).is_err());
        assert!(parse(&["search", "--request", "r.json", "--lat", "52.5"]).is_err());
    }

    #[test]
    fn search_from_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"lat": 52.52, "lng": 13.405, "search_input": "pizza",
                "search_radius": 1500, "datetime": "2020-11-21 19:30:00", "limit": 20}"#,
        )
        .unwrap();

        let cli = parse(&["search", "--request", path.to_str().unwrap(), "--no-render"]).unwrap();
        let args = search_args(cli);
        assert!(args.no_render);
        let request = args.to_request().unwrap();
        assert_eq!(request.limit(), 20);
        assert_eq!(request.radius_m(), 1500);
    }

    #[test]
    fn invalid_datetime_is_rejected() {
        let cli = parse(&[
            "search", "--lat", "52.52", "--lng", "13.4", "--query", "coffee", "--radius", "800",
            "--at", "tomorrow",
        ])
        .unwrap();
        assert!(search_args(cli).to_request().is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["history", "-vv", "--config", "other.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
        assert!(matches!(cli.command, Commands::History { limit: 10 }));
    }

    #[test]
    fn credentials_need_both_client_parts() {
        assert!(parse(&["credentials", "add", "--provider", "foursquare", "--client-id", "x"]).is_err());
        let cli = parse(&[
            "credentials", "add", "--provider", "foursquare", "--client-id", "x",
            "--client-secret", "y",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Credentials(CredentialsCommand::Add { ref client_secret, .. })
                if client_secret.as_deref() == Some("y")
        ));
    }
}
