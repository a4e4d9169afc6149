mod config;
mod db;
mod llm;
mod prerender;
mod routes;
mod services;
mod state;
mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::llm::LlmClient;
use crate::services::video::PgVideoStore;
use crate::storage::{StorageConfig, SupabaseStorage};

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Prerender(#[from] prerender::PrerenderError),
    #[error("{0} route(s) failed to prerender")]
    RoutesFailed(usize),
}

#[derive(Parser, Debug)]
#[command(name = "agrifact", about = "AgriFact API server and prerender tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Write static HTML for every site route.
    Prerender(PrerenderArgs),
}

#[derive(Args, Debug)]
struct PrerenderArgs {
    /// HTML template containing the app markers. Defaults to the copy saved
    /// by an earlier run, else `<out>/index.html`.
    #[arg(long)]
    template: Option<PathBuf>,

    #[arg(long, env = "STATIC_DIR", default_value = config::DEFAULT_STATIC_DIR)]
    out: PathBuf,

    /// Origin for `sitemap.xml`. No sitemap when unset.
    #[arg(long, env = "SITE_URL")]
    site_url: Option<String>,

    /// Exit non-zero if any route fails.
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Prerender(args) => run_prerender(args).await,
    }
}

async fn serve() -> Result<(), MainError> {
    let config = AppConfig::from_env()?;
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;

    let mut state = state::AppState::new(Arc::new(PgVideoStore::new(pool)), config.static_dir.clone());
    state.fact_check_max_tokens = config.fact_check_max_tokens;

    match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "ai client configured");
            let client = Arc::new(client);
            state.llm = Some(client.clone());
            state.audio = Some(client);
        }
        Err(e) => tracing::warn!(error = %e, "ai client disabled; fact-check and speech endpoints will fail"),
    }

    match StorageConfig::from_env().and_then(SupabaseStorage::new) {
        Ok(storage) => {
            tracing::info!(bucket = storage.bucket(), "video storage configured");
            state.storage = Some(Arc::new(storage));
        }
        Err(e) => tracing::warn!(error = %e, "video storage disabled; video proxy will fail"),
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, static_dir = %config.static_dir.display(), "agrifact listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_prerender(args: PrerenderArgs) -> Result<(), MainError> {
    let site_url = args.site_url.as_deref().map(|s| s.trim_end_matches('/'));
    let template = args.template.unwrap_or_else(|| prerender::default_template(&args.out));
    tracing::info!(template = %template.display(), out = %args.out.display(), "prerender: starting");
    let report = prerender::prerender(
        prerender::ROUTES,
        &template,
        &args.out,
        &prerender::pages::LeptosRenderer,
        site_url,
    )
    .await?;

    for (route, reason) in &report.failed {
        tracing::error!(%route, %reason, "prerender: route not written");
    }
    if let Some(path) = &report.sitemap {
        tracing::info!(path = %path.display(), "prerender: sitemap written");
    }
    if args.strict && !report.is_success() {
        return Err(MainError::RoutesFailed(report.failed.len()));
    }
    Ok(())
}
