mod handlers;
mod routes;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::context::AppContext;

/// Bind and serve the HTTP API until the process is stopped.
pub async fn run(ctx: Arc<AppContext>, port: u16) -> Result<()> {
    let app = routes::routes().with_state(ctx);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("diffgate listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
