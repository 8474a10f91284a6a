use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{RunEvent, Session};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NavigateRequest {
    #[schemars(description = "Checkout page URL to navigate to")]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

fn err(e: impl std::fmt::Display) -> ErrorData {
    ErrorData::internal_error(e.to_string(), None::<Value>)
}

fn text_ok(s: impl Into<String>) -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::success(vec![Content::text(s.into())]))
}

#[derive(Clone)]
pub struct PromoServer {
    session: Arc<Mutex<Option<Session>>>,
    tool_router: ToolRouter<Self>,
}

impl PromoServer {
    async fn ensure_session(&self) -> Result<(), ErrorData> {
        let mut guard = self.session.lock().await;
        if guard.is_none() {
            let session = Session::launch().await.map_err(err)?;
            *guard = Some(session);
        }
        Ok(())
    }
}

impl Default for PromoServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PromoServer {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Navigate to a checkout page. Launches browser on first call.")]
    async fn navigate(
        &self,
        req: Parameters<NavigateRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.ensure_session().await?;
        let guard = self.session.lock().await;
        let session = guard.as_ref().unwrap();
        let (url, title) = session.goto(&req.0.url).await.map_err(err)?;
        text_ok(format!("Navigated to: {}\nTitle: {}", url, title))
    }

    #[tool(
        description = "Start testing the configured promo codes against the current page. \
                       No-op if a run is already in progress. Poll 'status' for progress."
    )]
    async fn start_testing(&self) -> Result<CallToolResult, ErrorData> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or_else(|| {
            ErrorData::internal_error("No page open. Use navigate first.", None::<Value>)
        })?;

        if session.start_testing() {
            text_ok(format!("Testing {} codes.", session.codes().len()))
        } else {
            text_ok("Already running.")
        }
    }

    #[tool(
        description = "Stop the current run. Takes effect within one wait interval; \
                       the run reports a final 'stopped' status."
    )]
    async fn stop_testing(&self) -> Result<CallToolResult, ErrorData> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or_else(|| {
            ErrorData::internal_error("No page open. Use navigate first.", None::<Value>)
        })?;
        session.stop_testing();
        text_ok("Stop requested.")
    }

    #[tool(description = "Report run progress: events since the last status call, plus state.")]
    async fn status(&self) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(|| {
            ErrorData::internal_error("No page open. Use navigate first.", None::<Value>)
        })?;

        let events = session.drain_events();
        let mut out = String::new();
        for event in &events {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        let terminal = events
            .iter()
            .any(|e| !matches!(e, RunEvent::Progress { .. }));
        if session.is_running() && !terminal {
            out.push_str("State: running\n");
        } else {
            out.push_str("State: idle\n");
        }
        text_ok(out)
    }

    #[tool(description = "Take a screenshot of the page. Returns base64 PNG image.")]
    async fn screenshot(&self) -> Result<CallToolResult, ErrorData> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or_else(|| {
            ErrorData::internal_error("No page open. Use navigate first.", None::<Value>)
        })?;
        let png = session.screenshot().await.map_err(err)?;
        let b64 = BASE64.encode(&png);
        Ok(CallToolResult::success(vec![Content::image(
            b64,
            "image/png",
        )]))
    }

    #[tool(description = "Close the browser and release resources.")]
    async fn close(&self) -> Result<CallToolResult, ErrorData> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.take() {
            session.close().await;
        }
        text_ok("Browser closed.")
    }
}

#[tool_handler]
impl ServerHandler for PromoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "promohunt".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Promo-code testing server. Use 'navigate' to open a checkout page \
                 (launches browser automatically), 'start_testing' to try the configured \
                 codes in order, 'status' to poll progress, 'stop_testing' to cancel. \
                 'screenshot' shows the page state."
                    .into(),
            ),
        }
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    use rmcp::ServiceExt;

    let server = PromoServer::new();
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
