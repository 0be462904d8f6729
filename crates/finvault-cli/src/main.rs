//! Command-line interface for the FinVault evidence tools
//!
//! Runs the same tool surface the agent pipeline calls, against live data
//! sources. Clients, config, and the tool registry are constructed once at
//! startup and dispatched through by name.

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use finvault_evidence::{
    EvidenceConfig, FilingSectionsTool, HistoricalPriceTool, SecEdgarClient,
};
use finvault_session::EdgarIdentity;
use finvault_tools::ToolRegistry;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "finvault")]
#[command(about = "FinVault financial evidence tools", long_about = None)]
struct Args {
    /// Identifying address for SEC EDGAR access
    /// (falls back to the FINVAULT_IDENTITY environment variable)
    #[arg(long)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch weekly historical closing prices for a ticker
    Price {
        /// Stock ticker symbol (e.g., NVDA)
        ticker: String,
    },
    /// Fetch sections from a company's most recent SEC filing
    Filing {
        /// Stock ticker symbol (e.g., NVDA)
        ticker: String,
        /// Comma-separated section ids: mda, risk_factors, balance_sheet,
        /// income_statement, cashflow_statement
        #[arg(long, value_delimiter = ',', default_value = "mda,risk_factors")]
        sections: Vec<String>,
    },
}

fn resolve_identity(flag: Option<String>) -> anyhow::Result<Option<EdgarIdentity>> {
    let raw = flag.or_else(|| std::env::var("FINVAULT_IDENTITY").ok());
    match raw {
        Some(raw) => Ok(Some(EdgarIdentity::parse(&raw)?)),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    finvault_utils::init_tracing();

    let args = Args::parse();
    let identity = resolve_identity(args.identity)?;
    let config = Arc::new(EvidenceConfig::default());

    // Expensive resources are built once and shared read-only
    let edgar_client = match &identity {
        Some(identity) => SecEdgarClient::new(identity.user_agent()),
        None => SecEdgarClient::from_env(),
    };

    let registry = ToolRegistry::new();
    registry.register(Arc::new(HistoricalPriceTool::new(config.clone())));
    registry.register(Arc::new(FilingSectionsTool::new(edgar_client, config)));

    let (tool_name, params) = match &args.command {
        Command::Price { ticker } => ("get_historical_price", json!({ "ticker": ticker })),
        Command::Filing { ticker, sections } => {
            if identity.is_none() && std::env::var("SEC_USER_AGENT").is_err() {
                bail!(
                    "SEC EDGAR access requires an identifying address; \
                     pass --identity or set FINVAULT_IDENTITY"
                );
            }
            (
                "fetch_filing_sections",
                json!({ "ticker": ticker, "sections": sections }),
            )
        }
    };

    info!(tool = tool_name, "running evidence tool");

    let tool = registry
        .get(tool_name)
        .context("tool not registered")?;
    let output = tool.execute(params).await?;

    match output.as_str() {
        Some(text) => println!("{text}"),
        None => println!("{output}"),
    }

    Ok(())
}
