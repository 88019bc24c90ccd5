mod api;
mod llm;
mod server;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peer_match::config::EngineConfig;
use peer_match::insight::InsightProvider;
use peer_match::store::CommunityStore;
use peer_match::user::{generate_community, generate_connections};
use peer_match::{
    analyze_connection_success, format_float, format_percent, now_ms, RecommendationEngine,
};

#[derive(Parser)]
#[command(name = "peer-match", about = "Peer recommendation engine for patient communities")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Community data file; overrides the config value.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Recommend(RecommendArgs),
    Analyze(AnalyzeArgs),
    Seed(SeedArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct RecommendArgs {
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    ai_model: Option<String>,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    user_id: String,
}

#[derive(Args, Debug, Clone)]
struct SeedArgs {
    #[arg(long, default_value_t = 30)]
    users: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long)]
    ai_model: Option<String>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (mut config, _) = EngineConfig::load(cli.config)?;
    if let Some(data) = cli.data {
        config.store.data_path = data;
    }
    let store = CommunityStore::load(config.store.data_path.clone()).await?;

    match cli.command {
        Command::Recommend(args) => run_recommend(args, &config, &store).await,
        Command::Analyze(args) => run_analyze(args, &store).await,
        Command::Seed(args) => run_seed(args, &store).await,
        Command::Serve(args) => {
            let engine = build_engine(&config, args.ai_model.clone());
            let state = server::AppState {
                engine,
                store: Arc::new(store),
            };
            server::serve(args, state).await
        }
    }
}

fn build_engine(config: &EngineConfig, model: Option<String>) -> RecommendationEngine {
    let provider = llm::LlmClient::from_env(model, &config.llm)
        .map(|client| Arc::new(client) as Arc<dyn InsightProvider>);
    if provider.is_none() {
        tracing::warn!("LLM_API_KEY is not set; insights will use the fallback text");
    }
    RecommendationEngine::from_config(config, provider)
}

async fn run_recommend(
    args: RecommendArgs,
    config: &EngineConfig,
    store: &CommunityStore,
) -> Result<(), String> {
    // Surface a missing user as an error here; the engine itself only degrades.
    store.get_profile(&args.user_id).await?;

    let engine = build_engine(config, args.ai_model);
    let outcome = engine.recommend_for_user(store, &args.user_id).await;

    println!(
        "Evaluated {} candidates, {} recommendations for {}",
        outcome.total_evaluated,
        outcome.recommendations.len(),
        args.user_id
    );
    for (rank, recommendation) in outcome.recommendations.iter().enumerate() {
        println!(
            "{:>2}. {} score {} ({}, confidence {})",
            rank + 1,
            recommendation.user_id,
            format_float(recommendation.score, 1),
            recommendation.recommendation_type.label(),
            format_float(recommendation.confidence, 0)
        );
        for reason in &recommendation.reasons {
            println!("      - {}", reason);
        }
        println!("      {}", recommendation.ai_insight);
        if args.details {
            let c = &recommendation.compatibility;
            println!(
                "      symptoms {} | interests {} | communication {} | experience {} | activity {}",
                format_float(c.symptom_overlap, 2),
                format_float(c.interest_alignment, 2),
                format_float(c.communication_match, 2),
                format_float(c.experience_match, 2),
                format_float(c.activity_match, 2)
            );
        }
    }

    Ok(())
}

async fn run_analyze(args: AnalyzeArgs, store: &CommunityStore) -> Result<(), String> {
    let connections = store.connections_from(&args.user_id).await;
    let analysis = analyze_connection_success(&args.user_id, &connections);

    println!(
        "Connection success rate: {} over {} requests",
        format_percent(analysis.success_rate),
        connections.len()
    );
    if !analysis.preferred_types.is_empty() {
        println!("Preferred types: {}", analysis.preferred_types.join(", "));
    }
    println!("\nRecommendations:");
    for recommendation in analysis.recommendations {
        println!("- {}", recommendation);
    }
    Ok(())
}

async fn run_seed(args: SeedArgs, store: &CommunityStore) -> Result<(), String> {
    let now = now_ms();
    let profiles = generate_community(args.users, args.seed, now);
    let connections = generate_connections(&profiles, args.seed, now);
    let (profile_count, connection_count) = (profiles.len(), connections.len());
    store.replace_all(profiles, connections).await?;
    let refreshed = store.refresh_activity(now).await?;
    tracing::info!(refreshed, "recomputed engagement scores");

    println!(
        "Wrote {} profiles and {} connection requests to {}",
        profile_count,
        connection_count,
        store.path().display()
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,peer_match=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
