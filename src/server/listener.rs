use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionConfig};
use crate::resources::{DynamicStore, SharedStore, StaticTable};
use crate::router::Router;

/// Builds the router for a configuration: builtin static table and an empty store.
pub fn router_from_config(cfg: &Config) -> Router {
    let store = DynamicStore::new(cfg.store.capacity, cfg.limits.max_body_size);
    Router::new(
        StaticTable::builtin(),
        SharedStore::new(store),
        cfg.store.content_length_policy,
    )
}

/// Binds the configured address and serves until `shutdown` is cancelled or
/// accepting fails.
pub async fn run(cfg: &Config, shutdown: CancellationToken) -> anyhow::Result<()> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(
        listener,
        router_from_config(cfg),
        ConnectionConfig::from_config(cfg),
        shutdown,
    )
    .await
}

/// Accept loop. One task per connection; the router, and with it the store,
/// is shared by all of them.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    config: ConnectionConfig,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Listener shutting down");
                return Ok(());
            }
            res = listener.accept() => res.context("accept failed")?,
        };
        info!("Accepted connection from {}", peer);

        let router = router.clone();
        let cancel = shutdown.child_token();
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, router, config, cancel);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {:#}", peer, e);
                }
                tracing::debug!("Connection closed");
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}
