mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kodi_stats_server::config::Config;
use kodi_stats_server::services::gallery::Gallery;
use kodi_stats_server::services::kodi::LibraryAction;
use kodi_stats_server::services::{export, render};
use kodi_stats_server::{build_router, AppState};

use crate::cli::{Cli, Commands, ProbeArgs, ServeArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kodi_stats_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = Cli::parse();

    // Load configuration, command line wins over the environment
    let mut config = Config::from_env();
    cli.kodi.apply(&mut config);

    match cli.command {
        Commands::Serve(args) => serve(config, args).await,
        Commands::Probe(args) => probe(config, args).await,
        Commands::Scan { library } => run_action(config, library.scan()).await,
        Commands::Clean { library } => run_action(config, library.clean()).await,
    }
}

async fn serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    let port = config.port;
    let public_url = format!("http://{}:{}", config.container_host, port);

    tracing::info!("Starting Kodi stats server v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState::new(config).context("building Kodi client")?);
    tracing::info!(
        "Kodi endpoint: {}",
        state.collector.client().connection().label()
    );
    tracing::info!("Artwork directory: {}", state.artwork.dir().display());

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{} (open {})", addr, public_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn probe(mut config: Config, args: ProbeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    let state = AppState::new(config).context("building Kodi client")?;
    let label = state.collector.client().connection().label();

    if !state.collector.connect().await {
        bail!("Failed to connect to Kodi at {}", label);
    }

    let stats = state.collector.collect().await;
    println!("{}", render::render_report(&stats));

    if args.save_html {
        // File dumps have no artwork route to point at
        let gallery = Gallery::build(&stats.recently_added, None).await;
        let last_updated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let page = render::render_page(
            &stats,
            &gallery,
            &label,
            &last_updated,
            state.config.refresh_interval_secs,
        );
        export::save_html(&state.config.html_file, &page).await?;
        println!("HTML report saved to {}", state.config.html_file);
    }

    if args.save_json {
        export::save_json(&state.config.json_file, &stats.summary()).await?;
        println!("Library statistics saved to {}", state.config.json_file);
    }

    Ok(())
}

async fn run_action(config: Config, action: LibraryAction) -> anyhow::Result<()> {
    let state = AppState::new(config).context("building Kodi client")?;
    let result = state.collector.client().trigger(action).await;
    println!("{}", result.message);

    if !result.success {
        bail!("{} failed", action.description());
    }
    Ok(())
}
