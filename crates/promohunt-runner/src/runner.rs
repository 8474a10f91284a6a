//! The code-testing loop: one pass over the candidate list, cooperatively
//! cancellable, reporting progress per code and exactly one terminal event.

use crate::{CheckoutPage, Error, Result, RunEvent, SuccessDetector};
use promohunt_locator::{locate, submit_plan, SubmitPlan};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Whether the run was cancelled before exhausting the list.
    pub stopped: bool,
    /// Number of codes a progress event was emitted for.
    pub attempted: usize,
    /// Codes the success scan flagged (empty unless detection is on).
    pub successful_codes: Vec<String>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Tests a fixed ordered list of codes against a checkout page.
///
/// All run state lives on the instance: independent runners can coexist,
/// and `stop()` is safe from any task at any time. A runner is reusable;
/// each `run()` is a fresh pass over the same list.
pub struct PromoRunner {
    codes: Vec<String>,
    delay: Duration,
    detector: Option<SuccessDetector>,
    events: UnboundedSender<RunEvent>,
    running: AtomicBool,
    cancel: Mutex<CancellationToken>,
}

impl PromoRunner {
    /// Create a runner over the given codes.
    pub fn new(
        codes: Vec<String>,
        delay: Duration,
        detector: Option<SuccessDetector>,
        events: UnboundedSender<RunEvent>,
    ) -> Self {
        Self {
            codes,
            delay,
            detector,
            events,
            running: AtomicBool::new(false),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Create a runner from a loaded config.
    pub fn from_config(config: &crate::Config, events: UnboundedSender<RunEvent>) -> Self {
        let detector = config.detect_success.then(SuccessDetector::new);
        Self::new(
            config.codes.clone(),
            Duration::from_millis(config.delay_ms),
            detector,
            events,
        )
    }

    /// Whether a run is currently in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The configured candidate codes, in test order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Execute one pass over the code list.
    ///
    /// No-op when a run is already in progress: returns `Ok(None)` without
    /// emitting anything. Otherwise runs to completion or cancellation and
    /// returns the summary. Per-code failures never abort the pass; only
    /// losing the event listener does.
    pub async fn run(&self, page: &dyn CheckoutPage) -> Result<Option<RunSummary>> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("run already in progress, ignoring start");
            return Ok(None);
        }

        let result = self.run_codes(page).await;
        // Arm the next run before going idle, so a stale cancellation can
        // never leak into it.
        self.replace_token();
        self.running.store(false, Ordering::SeqCst);

        match result {
            Ok(summary) => Ok(Some(summary)),
            Err(e) => {
                error!("run aborted: {}", e);
                let _ = self.events.send(RunEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Request cancellation.
    ///
    /// During a run the loop observes it within one delay interval and
    /// emits the single terminal `Stopped` itself. Invoked while idle,
    /// this emits a direct stopped notification. Idempotent either way.
    pub fn stop(&self) {
        info!("stop requested");
        let was_running = self.is_running();
        self.current_token().cancel();
        if !was_running {
            self.replace_token();
            let _ = self.events.send(RunEvent::Stopped);
        }
    }

    async fn run_codes(&self, page: &dyn CheckoutPage) -> Result<RunSummary> {
        // Shared with stop(): a stop that lands while this run is starting
        // up cancels the same token the loop is about to poll.
        let cancel = self.current_token();
        let start = Instant::now();
        let mut attempted = 0;
        let mut successful_codes = Vec::new();

        info!("testing {} codes", self.codes.len());
        for code in &self.codes {
            if cancel.is_cancelled() {
                info!("testing stopped before {}", code);
                self.emit(RunEvent::Stopped)?;
                return Ok(self.summary(true, attempted, successful_codes, start));
            }

            self.emit(RunEvent::Progress { code: code.clone() })?;
            attempted += 1;

            // The page may have re-rendered since the last attempt, so the
            // field is re-located from a fresh snapshot every time. Any
            // failure here means "this code did not succeed", nothing more.
            let marked = match self.attempt(page, code).await {
                Ok(selector) => selector,
                Err(e) => {
                    warn!("attempt for {} failed: {}", code, e);
                    None
                }
            };

            // Let the page react. Cancellation interrupts the wait and is
            // picked up at the top of the next iteration.
            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = cancel.cancelled() => {}
            }

            if let Some(selector) = marked {
                let _ = page.clear_highlight(&selector).await;
                if let Some(detector) = &self.detector {
                    match page.visible_text().await {
                        Ok(text) if detector.matches(&text) => {
                            info!("code {} looks applied", code);
                            successful_codes.push(code.clone());
                        }
                        Ok(_) => {}
                        Err(e) => debug!("success scan skipped: {}", e),
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            self.emit(RunEvent::Stopped)?;
            return Ok(self.summary(true, attempted, successful_codes, start));
        }

        self.emit(RunEvent::Completed {
            successful_codes: successful_codes.clone(),
        })?;
        Ok(self.summary(false, attempted, successful_codes, start))
    }

    /// One trial: locate, mark, fill, submit. Returns the driven field's
    /// selector so the loop can restore it, or `None` on a locator miss.
    async fn attempt(&self, page: &dyn CheckoutPage, code: &str) -> Result<Option<String>> {
        let snap = page.snapshot().await?;
        let Some(field) = locate(&snap) else {
            debug!("no promo input found for {}", code);
            return Ok(None);
        };

        let plan = submit_plan(&snap, field);
        debug!("typing {} into {}", code, field.selector);

        let _ = page.highlight(&field.selector).await;
        page.set_value(&field.selector, code).await?;

        match plan {
            SubmitPlan::Click(selector) => page.click(&selector).await?,
            SubmitPlan::FormEvent(selector) => page.submit_form(&selector).await?,
            SubmitPlan::EnterKey => page.press_enter(&field.selector).await?,
        }

        Ok(Some(field.selector.clone()))
    }

    fn emit(&self, event: RunEvent) -> Result<()> {
        self.events.send(event).map_err(|_| Error::ChannelClosed)
    }

    fn summary(
        &self,
        stopped: bool,
        attempted: usize,
        successful_codes: Vec<String>,
        start: Instant,
    ) -> RunSummary {
        RunSummary {
            stopped,
            attempted,
            successful_codes,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn replace_token(&self) {
        let mut guard = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
        *guard = CancellationToken::new();
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
