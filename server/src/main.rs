use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datastore::{InMemoryRepository, Repository};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use video_service::MockOptions;
use youtube_client::{SearchSession, SearchState, YouTubeClient};

#[derive(Parser)]
#[command(name = "nalgotube", version, about = "Keyword video search front-end for YouTube")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the search and watch pages
    Serve {
        #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,
    },
    /// Serve a local stand-in for the YouTube search and videos endpoints
    Mock {
        #[arg(long, env = "MOCK_BIND_ADDRESS", default_value = "127.0.0.1:8089")]
        bind: SocketAddr,
        /// Only accept requests carrying this key
        #[arg(long, env = "MOCK_API_KEY")]
        api_key: Option<String>,
        /// Reject every request with a quotaExceeded error
        #[arg(long)]
        quota_exhausted: bool,
    },
    /// Read queries from stdin and print the results of the latest one
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { bind } => serve(bind).await,
        Command::Mock {
            bind,
            api_key,
            quota_exhausted,
        } => {
            let options = MockOptions {
                api_key,
                quota_exhausted,
            };
            mock(bind, options).await
        }
        Command::Interactive => interactive().await,
    }
}

fn youtube_client() -> Result<YouTubeClient> {
    let client = YouTubeClient::from_env().context("failed to configure the YouTube client")?;
    let config = client.config();
    tracing::info!(
        base_url = %config.base_url,
        page_size = config.page_size,
        timeout = ?config.timeout,
        failure_policy = ?config.failure_policy,
        "YouTube client configured"
    );
    Ok(client)
}

async fn serve(bind: SocketAddr) -> Result<()> {
    let client = youtube_client()?;
    let app = web::create_router(web::AppState::new(client));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!("Server listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn mock(bind: SocketAddr, options: MockOptions) -> Result<()> {
    let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::with_sample_data());
    let app = video_service::create_router(repo, options);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!("Fixture YouTube API listening on http://{}/youtube/v3", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn interactive() -> Result<()> {
    let session = Arc::new(SearchSession::new(youtube_client()?));

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            print_state(&state);
        }
    });

    println!("Type a keyword and press enter. Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let session = session.clone();
        tokio::spawn(async move {
            session.submit(&line).await;
        });
    }

    // The printer stops once every in-flight search has released the session
    drop(session);
    printer.await?;
    Ok(())
}

fn print_state(state: &SearchState) {
    match state {
        SearchState::Idle => println!("Search to find videos."),
        SearchState::Loading { query } => println!("Searching \"{query}\"..."),
        SearchState::Ready { query, items } if items.is_empty() => {
            println!("No videos found for \"{query}\".");
        }
        SearchState::Ready { query, items } => {
            println!("{} videos for \"{query}\":", items.len());
            for item in items {
                println!("  https://www.youtube.com/watch?v={}  {} | {}", item.id, item.title, item.channel_name);
            }
        }
        SearchState::Failed { query, message } => eprintln!("\"{query}\": {message}"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
