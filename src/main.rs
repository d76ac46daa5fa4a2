use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commit_digest::api::{self, AppState};
use commit_digest::config::{Config, DigestMode};
use commit_digest::models::SummarizeRequest;

#[derive(Parser)]
#[command(name = "commit-digest")]
#[command(about = "Group and summarize recent commit history of a GitHub repository")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides DIGEST_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides DIGEST_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Response mode: detailed or direct (overrides DIGEST_MODE)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<DigestMode>,
    },
    /// Run one digest and print the JSON result
    Digest {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        repo: String,

        /// Window size in days (defaults to DIGEST_DEFAULT_DAYS)
        #[arg(short, long)]
        days: Option<u32>,

        /// Response mode: detailed or direct (overrides DIGEST_MODE)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<DigestMode>,
    },
}

fn parse_mode(s: &str) -> Result<DigestMode, String> {
    DigestMode::from_str(s).ok_or_else(|| format!("unknown mode '{}', expected detailed or direct", s))
}

fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "commit_digest=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Digest mode prints the result on stdout
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let app = api::create_router(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("commit-digest listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Some(Commands::Digest { .. })));

    let mut config = Config::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port, mode }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            serve(config).await?;
        }
        Some(Commands::Digest {
            owner,
            repo,
            days,
            mode,
        }) => {
            if let Some(mode) = mode {
                config.mode = mode;
            }
            let query = SummarizeRequest::new(owner, repo, days).validate(config.default_days)?;
            let state = AppState::from_config(config)?;

            let result = api::digest(&state, &query).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        None => serve(config).await?,
    }

    Ok(())
}
