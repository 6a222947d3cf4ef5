use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use server::kv::KvClient;
use server::{router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let settings = Settings::new()?;

    let state = AppState {
        kv: KvClient::new(&settings.kv.url, &settings.kv.token),
        code: settings.auth.code,
        session_ttl: settings.auth.ttl,
    };
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", settings.listen.host, settings.listen.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
