use anyhow::Context;
use clap::Parser;
use std::net::Ipv4Addr;
use std::sync::Arc;
use student_records::{
    api::{AppState, create_router},
    config, logging,
    students::StudentStore,
    summarization::OllamaSummaryClient,
};
use tokio::net::TcpListener;

/// Serve the student records API.
#[derive(Parser, Debug)]
#[command(name = "student-records", version, about)]
struct Cli {
    /// Override the listening port (defaults to `SERVER_PORT`, then 8080).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    config::init_config().context("Failed to load config from environment")?;
    let config = config::get_config();
    logging::init_tracing(config);

    let store = if config.seed_students {
        StudentStore::with_seed_data()
    } else {
        StudentStore::new()
    };
    let summarizer = OllamaSummaryClient::from_config(config)
        .context("Failed to construct summary client")?;
    tracing::info!(
        generation_url = %config.generation_url,
        model = %config.generation_model,
        students = store.len().await,
        "Initialized services"
    );
    let app = create_router(AppState::new(Arc::new(store), Arc::new(summarizer)));

    let port = cli.port.unwrap_or(config.server_port);
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
