//! Transport runners: stdio for desktop clients, streamable HTTP for everything else.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use nutrition_core::control::FoodQueries;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tokio::net::TcpListener;
use tracing::info;

use crate::NutritionMcp;
use crate::tools::ToolDispatcher;

pub const DEFAULT_HTTP_PORT: u16 = 8000;
const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);
const SSE_RETRY: Duration = Duration::from_secs(3);

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Listener settings for the streamable HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    /// Stateless mode answers every request without a session.
    pub stateful_mode: bool,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr, stateful_mode: bool) -> Self {
        Self {
            addr,
            stateful_mode,
        }
    }

    fn streamable_http(self) -> StreamableHttpServerConfig {
        StreamableHttpServerConfig {
            sse_keep_alive: Some(SSE_KEEP_ALIVE),
            sse_retry: Some(SSE_RETRY),
            stateful_mode: self.stateful_mode,
            ..Default::default()
        }
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(
            SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_HTTP_PORT)),
            false,
        )
    }
}

/// Serves MCP over stdin/stdout until the client disconnects.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio<Q: FoodQueries + 'static>(
    dispatcher: Arc<ToolDispatcher<Q>>,
) -> Result<(), BoxError> {
    info!("serving MCP over stdio");
    let running = serve_server(NutritionMcp::with_dispatcher(dispatcher), stdio()).await?;
    let reason = running.waiting().await?;
    info!(?reason, "stdio session ended");
    Ok(())
}

/// Routes `/mcp` to the streamable HTTP service and answers `/health` with `ok`.
pub fn http_router<Q: FoodQueries + 'static>(
    dispatcher: Arc<ToolDispatcher<Q>>,
    config: McpHttpServerConfig,
) -> Router {
    let service: StreamableHttpService<NutritionMcp<Q>, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(NutritionMcp::with_dispatcher(Arc::clone(&dispatcher))),
            Arc::new(LocalSessionManager::default()),
            config.streamable_http(),
        );
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service)
}

/// Binds `config.addr` and serves [`http_router`] until the listener fails.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http<Q: FoodQueries + 'static>(
    dispatcher: Arc<ToolDispatcher<Q>>,
    config: McpHttpServerConfig,
) -> Result<(), BoxError> {
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        addr = %listener.local_addr()?,
        stateful = config.stateful_mode,
        "serving MCP over streamable HTTP"
    );
    axum::serve(listener, http_router(dispatcher, config)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use nutrition_core::control::NutritionControlPlane;
    use surrealdb::Surreal;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;

    #[test]
    fn default_config_is_stateless_on_port_8000() {
        let config = McpHttpServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8000".parse::<SocketAddr>().expect("valid addr"));
        assert!(!config.stateful_mode);

        let http = config.streamable_http();
        assert!(!http.stateful_mode);
        assert_eq!(http.sse_keep_alive, Some(SSE_KEEP_ALIVE));
    }

    #[test]
    fn stateful_mode_reaches_the_http_service() {
        let config = McpHttpServerConfig::new(McpHttpServerConfig::default().addr, true);
        assert!(config.streamable_http().stateful_mode);
    }

    #[tokio::test]
    async fn health_route_answers_without_touching_the_store() {
        let dispatcher = Arc::new(ToolDispatcher::new(NutritionControlPlane::new(
            Surreal::<surrealdb::engine::local::Db>::init(),
        )));
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("ephemeral port should bind");
        let addr = listener.local_addr().expect("bound address");
        let router = http_router(dispatcher, McpHttpServerConfig::new(addr, false));
        let server = tokio::spawn(async move { axum::serve(listener, router).await });

        let mut stream = TcpStream::connect(addr).await.expect("server should accept");
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .expect("request should be written");
        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .expect("response should be read");
        server.abort();

        assert!(response.starts_with("HTTP/1.1 200"), "unexpected response: {response}");
        assert!(response.ends_with("ok"), "unexpected response: {response}");
    }
}
