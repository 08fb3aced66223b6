//! Trip planner CLI
//!
//! Serves the planning API and web form, or plans a single trip from the
//! command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use trip_planner::api::AppState;
use trip_planner::config::EmbeddingProvider;
use trip_planner::{
    AttractionStore, TripPlanner, TripPlannerConfig, TripRequest, cache, embedding, extractor,
    logging, narrator, render, web,
};

#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(author, version, about = "Personalized travel itineraries from a curated attraction dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "TRIPPLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on, overrides the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Plan a single trip and print it
    Plan(PlanArgs),
}

#[derive(Args)]
struct PlanArgs {
    /// Destination city, state or several separated by commas
    destination: String,

    /// Number of days
    #[arg(short, long, default_value_t = 3)]
    days: i64,

    /// Budget tier: low, medium or high [default: medium, or read from --notes]
    #[arg(short, long)]
    budget: Option<String>,

    /// Group type: solo, couple, family or friends [default: friends, or read from --notes]
    #[arg(short, long)]
    group: Option<String>,

    /// Comma separated interests, e.g. "beaches, food"
    #[arg(short, long, default_value = "")]
    interests: String,

    /// Itinerary style: relaxed, standard or packed
    #[arg(short, long)]
    style: Option<String>,

    /// Free-text notes, e.g. "with kids, love street food"
    #[arg(short, long)]
    notes: Option<String>,

    /// Starting city for travel suggestions
    #[arg(long = "from")]
    source_city: Option<String>,

    /// Also write the plan as PDF to this file
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl From<&PlanArgs> for TripRequest {
    fn from(args: &PlanArgs) -> Self {
        TripRequest {
            destination: args.destination.clone(),
            days: args.days,
            budget: args.budget.clone().unwrap_or_default(),
            group: args.group.clone().unwrap_or_default(),
            interests: args.interests.clone(),
            style: args.style.clone(),
            source_city: args.source_city.clone(),
            notes: args.notes.clone(),
        }
    }
}

async fn build_planner(config: &TripPlannerConfig) -> Result<TripPlanner> {
    if config.cache.enabled && config.embedding.provider == EmbeddingProvider::Http {
        let dir = config.cache_dir();
        match cache::init(&dir) {
            Ok(()) => info!("Caching query embeddings in {}", dir.display()),
            Err(e) => warn!("Cache disabled, could not open {}: {}", dir.display(), e),
        }
    }

    let cache_ttl = Duration::from_secs(u64::from(config.cache.ttl_hours) * 3600);
    let embedder = embedding::from_config(&config.embedding, cache_ttl)?;
    let store = AttractionStore::load(&config.dataset.path, embedder.as_ref())
        .await
        .with_context(|| format!("Failed to load attractions from '{}'", config.dataset.path))?;
    info!("Embedding queries with {}", embedder.model_name());

    let narrator = narrator::from_config(&config.narrator)?;
    let extractor = extractor::from_config(&config.extractor)?;
    Ok(TripPlanner::new(Arc::new(store), embedder, narrator, &config.planner).with_extractor(extractor))
}

async fn plan(args: PlanArgs, planner: &TripPlanner) -> Result<()> {
    let plan = match planner.plan(TripRequest::from(&args)).await {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render::render_text(&plan));
    }

    if let Some(path) = args.pdf {
        let bytes = render::render_pdf(&plan)?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write PDF to {}", path.display()))?;
        eprintln!("PDF written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TripPlannerConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose);

    let planner = build_planner(&config).await?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = Arc::new(AppState { planner });
            web::run(state, &config.server).await
        }
        Commands::Plan(args) => plan(args, &planner).await,
    }
}
