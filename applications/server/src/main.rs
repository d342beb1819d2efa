/// Tilawa Server - verse text and range parsing API
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tilawa_client::{OpenAiRangeParser, QuranCloudClient, RangeFields};
use tilawa_core::{NormalizingProvider, Position, RangeParser, VerseTextProvider};
use tilawa_server::{config::ServerConfig, create_router, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tilawa-server")]
#[command(about = "Quran recitation companion API", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml if present)
    #[arg(short, long, global = true, env = "TILAWA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Fetch and print one verse
    Verse {
        /// Surah number (1-114)
        surah: u16,
        /// Ayah number within the surah
        ayah: u16,
        /// Print the text exactly as the upstream returns it
        #[arg(long)]
        raw: bool,
    },
    /// Parse a free-form repeat request and print the range as JSON
    ParseRange {
        /// Request text, e.g. "repeat al-fajr 1 to 5 three times"
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tilawa_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::Verse { surah, ayah, raw } => {
            print_verse(&config, Position::new(surah, ayah)?, raw).await?;
        }
        Commands::ParseRange { text } => {
            parse_range(&config, &text).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Tilawa Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!(
        "Range parsing limited to {} requests per {}s per caller",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs
    );

    // Build application state
    let app_state = AppState::from_config(&config)?;

    // Build router
    let app = create_router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Peer addresses identify callers without a session header
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn print_verse(config: &ServerConfig, position: Position, raw: bool) -> anyhow::Result<()> {
    let client = QuranCloudClient::new(config.quran.clone())?;

    let verse = if raw {
        client.fetch_verse(position).await?
    } else {
        NormalizingProvider::new(client).fetch_verse(position).await?
    };

    println!("{}", position);
    println!("{}", verse.arabic_text);
    println!("{}", verse.english_text);
    if let Some(count) = verse.surah_verse_count {
        println!("({} verses in surah {})", count, position.surah());
    }

    Ok(())
}

async fn parse_range(config: &ServerConfig, text: &str) -> anyhow::Result<()> {
    if config.openai.api_key.trim().is_empty() {
        anyhow::bail!("OpenAI API key is required (set OPENAI_API_KEY)");
    }

    let parser = OpenAiRangeParser::new(config.openai.clone())?;
    let range = parser.parse_range(text).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&RangeFields::from(range))?
    );
    println!("{} plays in total", range.total_plays());

    Ok(())
}
