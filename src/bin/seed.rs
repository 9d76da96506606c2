use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use trivia_api::config;
use trivia_api::db::{self, SeedData};

#[derive(Debug, Parser)]
#[command(author, version, about = "Load categories and questions from a YAML seed file")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to YAML seed file
    #[arg(long, default_value = "seed.yaml")]
    seed: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let content = std::fs::read_to_string(&args.seed)
        .with_context(|| format!("reading seed file {}", args.seed.display()))?;
    let seed: SeedData = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing seed file {}", args.seed.display()))?;

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url());
    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    let (categories, questions) = db::apply_seed(&pool, &seed).await?;
    info!(categories, questions, "seed applied");
    pool.close().await;
    Ok(())
}
