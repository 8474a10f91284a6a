//! # promohunt
//!
//! Promo-code testing for checkout pages. Use directly or via MCP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promohunt::Session;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut session = Session::launch().await?;
//! session.goto("https://shop.example/checkout").await?;
//!
//! // Fire-and-forget: the run reports through events.
//! session.start_testing();
//! loop {
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     for event in session.drain_events() {
//!         println!("{}", event);
//!     }
//!     if !session.is_running() {
//!         break;
//!     }
//! }
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod mcp;
pub mod notify;

pub use promohunt_locator::{locate, snapshot, submit_plan, InputField, PageSnapshot, SubmitPlan};
pub use promohunt_runner::{
    BrowserConfig, Config, LiveCheckout, PromoRunner, RunEvent, RunSummary, SuccessDetector,
    DEFAULT_CODES,
};

// Re-export eoka types that users need
pub use eoka::{Browser, Error, Page, StealthConfig};

use anyhow::anyhow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Browser launch options.
    pub browser: BrowserConfig,
    /// Candidate codes, tried in order.
    pub codes: Vec<String>,
    /// Delay after each submission in milliseconds.
    pub delay_ms: u64,
    /// Run the best-effort success scan after each attempt.
    pub detect_success: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            codes: DEFAULT_CODES.iter().map(|c| c.to_string()).collect(),
            delay_ms: 1500,
            detect_success: false,
        }
    }
}

enum Command {
    Goto {
        url: String,
        reply: oneshot::Sender<anyhow::Result<(String, String)>>,
    },
    Start,
    Screenshot {
        reply: oneshot::Sender<anyhow::Result<Vec<u8>>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// A browser session that owns its browser and page, plus a runner wired
/// to them. This is the primary API for most use cases.
///
/// The browser lives on a dedicated task; the session is a cheap handle.
/// `stop_testing` works out-of-band at any time, including mid-run.
pub struct Session {
    cmd_tx: mpsc::UnboundedSender<Command>,
    runner: Arc<PromoRunner>,
    start_queued: Arc<AtomicBool>,
    events: mpsc::UnboundedReceiver<RunEvent>,
}

impl Session {
    /// Launch a new browser with default settings and the built-in codes.
    pub async fn launch() -> anyhow::Result<Self> {
        Self::launch_with_config(SessionConfig::default()).await
    }

    /// Launch with custom session config.
    pub async fn launch_with_config(config: SessionConfig) -> anyhow::Result<Self> {
        let browser = Browser::launch_with_config(config.browser.stealth()).await?;
        let page = browser.new_page("about:blank").await?;

        let (event_tx, events) = mpsc::unbounded_channel();
        let detector = config.detect_success.then(SuccessDetector::new);
        let runner = Arc::new(PromoRunner::new(
            config.codes,
            Duration::from_millis(config.delay_ms),
            detector,
            event_tx,
        ));

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let start_queued = Arc::new(AtomicBool::new(false));
        tokio::spawn(drive(
            browser,
            page,
            runner.clone(),
            start_queued.clone(),
            cmd_rx,
        ));

        Ok(Self {
            cmd_tx,
            runner,
            start_queued,
            events,
        })
    }

    /// Navigate to a URL. Returns the final URL and page title.
    pub async fn goto(&self, url: &str) -> anyhow::Result<(String, String)> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Goto {
                url: url.into(),
                reply,
            })
            .map_err(|_| anyhow!("session closed"))?;
        rx.await.map_err(|_| anyhow!("session closed"))?
    }

    /// Begin a run over the configured code list.
    ///
    /// Safe to call repeatedly: returns `false` without queueing anything
    /// when a run is already queued or in progress.
    pub fn start_testing(&self) -> bool {
        if self.runner.is_running() || self.start_queued.swap(true, Ordering::SeqCst) {
            return false;
        }
        if self.cmd_tx.send(Command::Start).is_err() {
            self.start_queued.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    /// Request cancellation of the current run. Idempotent; takes effect
    /// within one wait interval.
    pub fn stop_testing(&self) {
        self.runner.stop();
    }

    /// Whether a run is queued or in progress.
    pub fn is_running(&self) -> bool {
        self.runner.is_running() || self.start_queued.load(Ordering::SeqCst)
    }

    /// The configured candidate codes, in test order.
    pub fn codes(&self) -> &[String] {
        self.runner.codes()
    }

    /// Take all events reported since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Take a plain screenshot of the page.
    pub async fn screenshot(&self) -> anyhow::Result<Vec<u8>> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Screenshot { reply })
            .map_err(|_| anyhow!("session closed"))?;
        rx.await.map_err(|_| anyhow!("session closed"))?
    }

    /// Close the browser.
    pub async fn close(self) {
        let (reply, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Close { reply }).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Owns the browser and page, processing session commands in order.
///
/// A run executes inline here, so the page is never touched from two
/// places at once; stop and status go through the runner handle and the
/// event channel instead of the command queue.
async fn drive(
    browser: Browser,
    page: Page,
    runner: Arc<PromoRunner>,
    start_queued: Arc<AtomicBool>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut close_reply = None;
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            Command::Goto { url, reply } => {
                let result = async {
                    page.goto(&url).await?;
                    let url = page.url().await?;
                    let title = page.title().await?;
                    Ok::<_, eoka::Error>((url, title))
                }
                .await
                .map_err(anyhow::Error::from);
                let _ = reply.send(result);
            }
            Command::Start => {
                let live = LiveCheckout::new(&page);
                match runner.run(&live).await {
                    Ok(Some(summary)) if summary.stopped => {
                        let _ = notify::show_stopped(&page).await;
                    }
                    Ok(Some(_)) => {
                        let _ = notify::show_completed(&page).await;
                    }
                    // Already running, or the error event was emitted.
                    Ok(None) | Err(_) => {}
                }
                start_queued.store(false, Ordering::SeqCst);
            }
            Command::Screenshot { reply } => {
                let _ = reply.send(page.screenshot().await.map_err(anyhow::Error::from));
            }
            Command::Close { reply } => {
                close_reply = Some(reply);
                break;
            }
        }
    }
    let _ = browser.close().await;
    if let Some(reply) = close_reply {
        let _ = reply.send(());
    }
}
