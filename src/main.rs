//! StrategyScout - Main Entry Point
//!
//! Command-line front end for the strategy API: runs one coordinator cycle
//! for the given filters and prints the derived views, or lists the
//! auxiliary reference data.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use strategy_scout::api::messages::{AnalyticsPeriod, AnalyticsSort, NewPoolsQuery};
use strategy_scout::config::{load_config, load_from_env};
use strategy_scout::{
    CycleOutcome, FilterState, GrowthFilter, QueryStatus, RiskLevel, SortOption,
    StrategyApiClient, StrategyCoordinator, Strategy,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long)]
    log_level: Option<String>,

    /// Strategy API base URL, overrides the configuration
    #[arg(long, env = "STRATEGY_SCOUT_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and rank strategies for a token
    Strategies {
        #[arg(short, long, default_value = "ETH")]
        token: String,

        /// Risk level (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        risk: RiskLevel,

        /// Exclude wrapped assets
        #[arg(long)]
        no_wrappers: bool,

        /// Sort order (apy, tvl, novelty)
        #[arg(long, default_value = "apy")]
        sort: SortOption,

        /// Keep strategies with 7-day APY growth of at least 5 points
        #[arg(long)]
        growth: bool,

        /// Keep new or still small pools
        #[arg(long)]
        only_new: bool,

        /// Show the top 10 only
        #[arg(long)]
        only_top: bool,

        /// Ask the backend for fresh data
        #[arg(long)]
        force: bool,
    },
    /// List tokens known to the backend
    Tokens {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List supported chains
    Chains,
    /// List supported protocols
    Protocols,
    /// Recently listed pools for the given symbols
    NewPools {
        /// Comma-separated token symbols
        #[arg(long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// Comma-separated chain names
        #[arg(long, value_delimiter = ',')]
        chains: Vec<String>,

        /// Look-back window (24h, 7d, 30d)
        #[arg(long, default_value = "7d")]
        period: String,

        /// Ranking (momentum, tvl_change, apy_change)
        #[arg(long, default_value = "momentum")]
        sort: String,

        #[arg(long, default_value_t = 30)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let mut config = if std::path::Path::new(&args.config).exists() {
        load_config(Some(&args.config))
    } else {
        load_from_env()
    }
    .context("failed to load configuration")?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }

    // Initialize logging
    let log_level = args.log_level.unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Using strategy API at {}", config.api.base_url);

    match args.command {
        Command::Strategies {
            token,
            risk,
            no_wrappers,
            sort,
            growth,
            only_new,
            only_top,
            force,
        } => {
            let filters = FilterState {
                token,
                risk_level: risk,
                include_wrappers: !no_wrappers,
                sort_by: sort,
                growth_filter: if growth {
                    GrowthFilter::ApyGrowthGt5
                } else {
                    GrowthFilter::None
                },
                only_new,
                only_top,
                ..FilterState::default()
            };
            run_strategies(StrategyCoordinator::from_config(&config)?.with_filters(filters), force)
                .await?;
        }
        Command::Tokens { limit } => {
            let client = StrategyApiClient::from_config(&config.api)?;
            for token in client.get_tokens(limit).await? {
                println!("{:<10} {}", token.symbol, token.name);
            }
        }
        Command::Chains => {
            let client = StrategyApiClient::from_config(&config.api)?;
            for chain in client.get_chains().await? {
                println!("{}", chain);
            }
        }
        Command::Protocols => {
            let client = StrategyApiClient::from_config(&config.api)?;
            for protocol in client.get_protocols().await? {
                println!("{}", protocol);
            }
        }
        Command::NewPools {
            symbols,
            chains,
            period,
            sort,
            limit,
        } => {
            let mut query = NewPoolsQuery::new(symbols);
            query.chains = chains;
            query.period = parse_period(&period)?;
            query.sort = parse_analytics_sort(&sort)?;
            query.limit = limit;

            let client = StrategyApiClient::from_config(&config.api)?;
            let response = client.get_new_pools(&query).await?;
            println!("{} pools over {}", response.count, response.period);
            for pool in &response.pools {
                println!(
                    "{:<24} {:<16} {:<12} apy {:>8.2}%  tvl ${:>14.0}",
                    pool.pair,
                    pool.protocol.as_deref().unwrap_or("-"),
                    pool.chain.as_deref().unwrap_or("-"),
                    pool.apy,
                    pool.tvl_usd,
                );
            }
        }
    }

    Ok(())
}

async fn run_strategies(coordinator: StrategyCoordinator, force: bool) -> Result<()> {
    let outcome = if force {
        coordinator.submit().await
    } else {
        coordinator.evaluate().await
    };

    match outcome {
        CycleOutcome::Idle => bail!("no token given"),
        CycleOutcome::Failed(message) => bail!(message),
        CycleOutcome::Superseded => bail!("request was cancelled"),
        CycleOutcome::CacheHit | CycleOutcome::Fetched(_) => {}
    }

    let snapshot = coordinator.snapshot();
    if let Some(data) = &snapshot.data {
        for warning in data.warnings() {
            println!("warning: {}", warning);
        }
    }

    if snapshot.status == QueryStatus::Empty {
        println!("No strategies found yet; the backend is still collecting data.");
        return Ok(());
    }

    let Some(view) = coordinator.view().await else {
        return Ok(());
    };

    println!("Top picks:");
    for (i, strategy) in view.preview.iter().enumerate() {
        print_strategy(i + 1, strategy);
    }

    if !view.table.is_empty() {
        println!();
        println!("All strategies ({}):", view.table.len());
        for (i, strategy) in view.table.iter().enumerate() {
            print_strategy(i + 1, strategy);
        }
    }

    Ok(())
}

fn print_strategy(rank: usize, strategy: &Strategy) {
    println!(
        "{:>3}. {:<20} {:<14} {:<24} apy {:>8.2}%  7d {:>7.2}  tvl ${:>14.0}  {}",
        rank,
        strategy.platform.as_deref().unwrap_or("-"),
        strategy.chain.as_deref().unwrap_or("-"),
        strategy.symbol.as_deref().unwrap_or("-"),
        strategy.apy_or_zero(),
        strategy.apy_7d.unwrap_or_default(),
        strategy.tvl_or_zero(),
        strategy.links.primary().unwrap_or(""),
    );
}

fn parse_period(value: &str) -> Result<AnalyticsPeriod> {
    match value {
        "24h" => Ok(AnalyticsPeriod::Day),
        "7d" => Ok(AnalyticsPeriod::Week),
        "30d" => Ok(AnalyticsPeriod::Month),
        other => bail!("unknown period '{}', expected 24h/7d/30d", other),
    }
}

fn parse_analytics_sort(value: &str) -> Result<AnalyticsSort> {
    match value {
        "momentum" => Ok(AnalyticsSort::Momentum),
        "tvl_change" => Ok(AnalyticsSort::TvlChange),
        "apy_change" => Ok(AnalyticsSort::ApyChange),
        other => bail!("unknown sort '{}', expected momentum/tvl_change/apy_change", other),
    }
}
