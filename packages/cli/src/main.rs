mod api;
mod buy;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Input;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, Upload};

#[derive(Parser)]
#[command(name = "filwp")]
#[command(about = "Monetize, find and buy text content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// FILWP server URL
    #[arg(long, global = true, env = "FILWP_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a text file and deploy its purchase contract
    Upload {
        /// File holding the text to monetize
        file: PathBuf,

        /// Display title
        #[arg(short, long)]
        title: Option<String>,

        /// Wallet that receives payments
        #[arg(short, long, env = "FILWP_WALLET_ADDRESS")]
        wallet: String,

        /// Price in tokens, e.g. 1.5
        #[arg(short, long)]
        amount: String,
    },

    /// Find the best matching content
    Search {
        /// Natural-language query
        query: String,
    },

    /// Print raw content by hash
    Fetch {
        #[arg(required = true)]
        hashes: Vec<String>,
    },

    /// Buy access to the best match for a query, then read it
    Buy {
        query: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        wallet: buy::WalletArgs,
    },

    /// Talk to the content discovery agent
    Chat {
        /// Send one message and exit; without it an interactive session starts
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.server);

    match cli.command {
        Commands::Upload {
            file,
            title,
            wallet,
            amount,
        } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            if content.trim().is_empty() {
                bail!("{} is empty", file.display());
            }

            println!("{}", style("Uploading and deploying contract...").cyan());
            let uploaded = api
                .upload(&Upload {
                    content: &content,
                    title: title.as_deref(),
                    wallet_address: &wallet,
                    amount: &amount,
                })
                .await?;

            println!("{}", style(&uploaded.message).green());
            println!("  summary:  {}", uploaded.summary);
            println!("  tags:     {}", uploaded.tags.join(", "));
            println!("  cid:      {}", uploaded.cid);
            println!("  download: {}", uploaded.download);
            println!("  contract: {}", uploaded.contract_address);
        }

        Commands::Search { query } => {
            let found = api.search(&query).await?;
            if found.total == 0 {
                println!("{}", style("No matching content found.").yellow());
            }
            for record in &found.results {
                println!("{}", render::record(record));
            }
        }

        Commands::Fetch { hashes } => {
            if let [hash] = hashes.as_slice() {
                println!("{}", api.fetch(hash).await?);
            } else {
                for (hash, content) in api.fetch_batch(&hashes).await? {
                    println!("{}", style(&hash).bold());
                    println!("{content}\n");
                }
            }
        }

        Commands::Buy { query, yes, wallet } => {
            buy::run(&api, &query, &wallet, yes).await?;
        }

        Commands::Chat { message: Some(message) } => {
            println!("{}", api.ask_agent(&message).await?);
        }

        Commands::Chat { message: None } => {
            println!("{}", style("Type a message, or an empty line to quit.").dim());
            loop {
                let message: String = Input::new()
                    .with_prompt("you")
                    .allow_empty(true)
                    .interact_text()?;
                if message.trim().is_empty() {
                    break;
                }
                match api.ask_agent(&message).await {
                    Ok(reply) => println!("{} {}", style("agent:").bold(), reply),
                    Err(e) => eprintln!("{} {e:#}", style("error:").red()),
                }
            }
        }
    }

    Ok(())
}
