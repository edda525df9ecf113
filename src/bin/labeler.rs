use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labeler::config::LabelerConfig;
use labeler::github::server::{create_app, ServerState};
use labeler::github::{GithubAppState, WebhookSecret};
use labeler::labeler::{create_context, LabelApi};

#[derive(clap::Parser)]
struct Opts {
    /// Secret used to authenticate webhooks.
    #[arg(long, env = "WEBHOOK_SECRET")]
    webhook_secret: String,

    /// Github App ID.
    #[arg(long, env = "APP_ID")]
    app_id: u64,

    /// Private key used to authenticate as a Github App.
    #[arg(long, env = "PRIVATE_KEY")]
    private_key: String,

    /// Path to a TOML file that overrides the default configuration.
    #[arg(long, env = "LABELER_CONFIG")]
    config: Option<PathBuf>,

    /// Port on which the webhook server listens.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

async fn server(state: ServerState, port: u16) -> anyhow::Result<()> {
    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let config = match &opts.config {
        Some(path) => LabelerConfig::load(path)
            .with_context(|| format!("Cannot load config from {}", path.display()))?,
        None => LabelerConfig::default(),
    };
    tracing::debug!(
        "Using {} valid label(s), removable marker {:?}",
        config.valid_labels.len(),
        config.removable_label_marker
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let app_state = runtime.block_on(GithubAppState::load(
        opts.app_id.into(),
        opts.private_key.into_bytes().into(),
    ))?;
    let ctx = create_context(Arc::new(app_state) as Arc<dyn LabelApi>, config);

    let state = ServerState::new(Arc::new(ctx), WebhookSecret::new(opts.webhook_secret));
    runtime.block_on(server(state, opts.port))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
