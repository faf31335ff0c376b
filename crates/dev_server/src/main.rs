//! Static server for the demo site and the compiled wasm module.
//!
//! Demo pages are served at `/`, the wasm-pack output at `/pkg/`.

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue},
    routing::get_service,
    Router,
};
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Demo server for the presage prefetch module")]
struct Args {
    /// Directory containing the demo pages
    #[arg(long, default_value = "demo")]
    root: PathBuf,

    /// wasm-pack output directory, mounted at /pkg
    #[arg(long, default_value = "crates/presage-wasm/pkg")]
    pkg: PathBuf,

    /// Address to bind (ip or host)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let Args {
        root,
        pkg,
        host,
        port,
    } = Args::parse();

    let root_dir = root
        .canonicalize()
        .with_context(|| format!("failed to locate demo root {root:?}"))?;
    let pkg_dir = canonicalize_or_create(&pkg)
        .with_context(|| format!("failed to locate or create {pkg:?}"))?;

    if dir_is_empty(&pkg_dir)? {
        warn!(
            "{} is empty; build the module with `wasm-pack build crates/presage-wasm --target web`",
            pkg_dir.display()
        );
    }

    let app = build_app(root_dir.clone(), pkg_dir);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("failed to parse bind address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;

    info!("serving {} on http://{}", root_dir.display(), addr);

    let server = axum::serve(listener, app.into_make_service());

    tokio::select! {
        result = server => result.context("server exited with error")?,
        _ = signal::ctrl_c() => {
            warn!("received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    // Ignore error if already set (e.g., during tests).
    let _ = fmt().with_env_filter(env_filter).try_init();
}

fn canonicalize_or_create(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(path.canonicalize()?)
}

fn dir_is_empty(path: &Path) -> Result<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

fn build_app(root_dir: PathBuf, pkg_dir: PathBuf) -> Router {
    let pages = get_service(ServeDir::new(root_dir).append_index_html_on_directories(true));
    let module = get_service(ServeDir::new(pkg_dir));

    // Prefetched documents must be reusable on the follow-up navigation, so
    // responses stay cacheable for a short window instead of `no-store`.
    let header_layer = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=60"),
        ))
        .layer(TraceLayer::new_for_http())
        .into_inner();

    Router::new()
        .nest_service("/pkg", module)
        .fallback_service(pages)
        .layer(header_layer)
}
