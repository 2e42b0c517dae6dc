//! Vitrine Feedgen - Google Shopping feed generation for Vitrine stores.
//!
//! # Usage
//!
//! ```bash
//! # Generate feeds for every eligible store
//! vitrine-feedgen generate
//!
//! # Explain one store's eligibility decision
//! vitrine-feedgen check dandan
//! ```
//!
//! # Exit codes
//!
//! - `0` - run completed; individual store failures are logged but never
//!   fatal
//! - `1` - fatal setup failure: invalid configuration, unusable output
//!   directory, or no stores to process at all

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use vitrine_core::EligibilityPolicy;
use vitrine_feedgen::config::FeedgenConfig;
use vitrine_feedgen::firestore::FirestoreClient;
use vitrine_feedgen::pipeline::{self, RunOptions};

#[derive(Parser)]
#[command(name = "vitrine-feedgen")]
#[command(author, version, about = "Vitrine feed generation tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate feeds for every eligible store (the default)
    Generate,
    /// Explain one store's eligibility decision
    Check {
        /// Store identifier
        store_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; info level for our crates if
    // RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_feedgen=info,vitrine_core=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Run failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = FeedgenConfig::from_env()?;
    let client = FirestoreClient::new(&config.firestore);
    let policy = EligibilityPolicy::default();

    match cli.command.unwrap_or(Commands::Generate) {
        Commands::Generate => {
            let options = RunOptions {
                output_dir: config.output_dir.clone(),
                fallback_stores: config.fallback_stores.clone(),
            };
            pipeline::run(&client, &policy, &config.profile, &options).await?;
        }
        Commands::Check { store_id } => check(&client, &policy, &store_id).await?,
    }
    Ok(())
}

/// Fetch one store's config and print the eligibility decision.
#[allow(clippy::print_stdout)]
async fn check(
    client: &FirestoreClient,
    policy: &EligibilityPolicy,
    store_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store_config = client.fetch_store_config(store_id).await?;
    let has_config = store_config.is_some();
    let store_config = store_config.unwrap_or_default();

    let eligible = policy.resolve(store_id, &store_config);
    let plan = EligibilityPolicy::plan_identifier(&store_config);

    println!("store:    {store_id}");
    println!("config:   {}", if has_config { "present" } else { "missing" });
    println!(
        "plan:     {}",
        if plan.is_empty() { "(none)" } else { plan.as_str() }
    );
    println!("status:   {:?}", store_config.subscription_status);
    println!("decision: {}", if eligible { "eligible" } else { "not eligible" });
    Ok(())
}
