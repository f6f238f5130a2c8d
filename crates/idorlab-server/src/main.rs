use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use idorlab_api::{AppState, AppStateInner, PostListPolicy};
use idorlab_auth::SessionRegistry;
use idorlab_store::MemStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "idorlab=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("IDORLAB_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("IDORLAB_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let policy: PostListPolicy = std::env::var("IDORLAB_POST_LIST_POLICY")
        .unwrap_or_else(|_| "filtered".into())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Shared state — everything lives in memory and dies with the process.
    let state: AppState = Arc::new(AppStateInner {
        store: Arc::new(MemStorage::new()),
        sessions: SessionRegistry::new(),
        post_list_policy: policy,
    });

    let app = idorlab_api::router(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("IDOR Lab server listening on {} (post list policy: {:?})", addr, policy);
    warn!("this server is intentionally vulnerable — keep it off untrusted networks");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Browser clients send the session cookie cross-origin, so credentials
/// must be allowed — which rules out a wildcard origin. Mirror the request
/// origin instead. Preflights are answered by the layer itself.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
