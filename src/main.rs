use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use interviewer::config::Config;
use interviewer::llm::{LanguageModel, OpenAiClient};
use interviewer::{chat, web_server};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Chat model used for questions and extraction.
    #[arg(long, global = true)]
    model: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run one interview in the terminal.
    Chat {
        #[arg(long, help = "Write the candidate radar chart to this SVG file.")]
        chart_out: Option<PathBuf>,
    },
    /// Serve the interview web UI, one session per browser connection.
    Serve {
        #[arg(long, env = "INTERVIEW_PORT", default_value_t = 9900, help = "Port for the web server.")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,interviewer=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Interviewer starting with command: {:?}", cli.command);

    let config = Config::from_env()
        .and_then(|config| config.with_overrides(cli.model, cli.base_url))
        .context("Invalid configuration")?;
    info!(model = %config.model, base_url = %config.base_url, "Language model configured");
    let model: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::new(config));

    match cli.command {
        Commands::Chat { chart_out } => {
            info!("Starting interactive interview...");
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let summary = chat::run_interview_chat(
                model.as_ref(),
                stdin.lock(),
                stdout.lock(),
                chart_out.as_deref(),
            )
            .await
            .context("Chat session failed")?;
            info!(
                session_id = %summary.id,
                complete = summary.details.is_complete(),
                "Interview finished"
            );
        }
        Commands::Serve { port } => {
            info!("Starting web server on port {}...", port);

            let mut web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(port, model).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, initiating shutdown...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
    }

    Ok(())
}
