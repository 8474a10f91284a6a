//! # promohunt-runner
//!
//! Sequential promo-code testing against a live checkout page. Define the
//! run in YAML, execute it code by code, stop it at any time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promohunt_runner::{Config, LiveCheckout, PromoRunner};
//!
//! # #[tokio::main]
//! # async fn main() -> promohunt_runner::Result<()> {
//! let config = Config::load("checkout.yaml")?;
//! let browser = eoka::Browser::launch_with_config(config.browser.stealth()).await?;
//! let page = browser.new_page("about:blank").await?;
//! page.goto(&config.target.url).await?;
//!
//! let (events, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let runner = PromoRunner::from_config(&config, events);
//! tokio::spawn(async move {
//!     while let Some(event) = rx.recv().await {
//!         println!("{}", event);
//!     }
//! });
//! runner.run(&LiveCheckout::new(&page)).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod events;
mod page;
mod runner;
mod success;

pub use config::{BrowserConfig, Config, TargetUrl, Viewport, DEFAULT_CODES};
pub use events::RunEvent;
pub use page::{CheckoutPage, LiveCheckout};
pub use runner::{PromoRunner, RunSummary};
pub use success::SuccessDetector;

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a test run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("page probe failed: {0}")]
    Probe(String),

    #[error("event channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: "Test"
target:
  url: "https://shop.example/checkout"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.target.url, "https://shop.example/checkout");
        assert!(!config.browser.headless);
        assert!(!config.detect_success);
        assert_eq!(config.delay_ms, 1500);
        // Defaults to the built-in candidate list.
        assert_eq!(config.codes.len(), DEFAULT_CODES.len());
        assert_eq!(config.codes[0], DEFAULT_CODES[0]);
    }

    #[test]
    fn test_parse_custom_codes_preserve_order() {
        let yaml = r#"
name: "Test"
target:
  url: "https://shop.example/checkout"
codes:
  - "SAVE15"
  - "WELCOME"
  - "SAVE15"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.codes, vec!["SAVE15", "WELCOME", "SAVE15"]);
    }

    #[test]
    fn test_parse_browser_config() {
        let yaml = r#"
name: "Test"
browser:
  headless: true
  proxy: "http://localhost:8080"
  user_agent: "Custom UA"
  viewport:
    width: 1920
    height: 1080
target:
  url: "https://shop.example/checkout"
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(config.browser.headless);
        assert_eq!(config.browser.proxy, Some("http://localhost:8080".into()));
        assert_eq!(config.browser.user_agent, Some("Custom UA".into()));
        let viewport = config.browser.viewport.unwrap();
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }

    #[test]
    fn test_parse_delay_and_detection() {
        let yaml = r#"
name: "Test"
target:
  url: "https://shop.example/checkout"
delay_ms: 800
detect_success: true
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.delay_ms, 800);
        assert!(config.detect_success);
    }

    #[test]
    fn test_validation_missing_name() {
        let yaml = r#"
target:
  url: "https://shop.example/checkout"
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_empty_name() {
        let yaml = r#"
name: ""
target:
  url: "https://shop.example/checkout"
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_missing_url() {
        let yaml = r#"
name: "Test"
target:
  url: ""
"#;
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_validation_empty_code_list() {
        let yaml = r#"
name: "Test"
target:
  url: "https://shop.example/checkout"
codes: []
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("codes"));
    }

    #[test]
    fn test_validation_zero_delay() {
        let yaml = r#"
name: "Test"
target:
  url: "https://shop.example/checkout"
delay_ms: 0
"#;
        let result = Config::parse(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("delay_ms"));
    }

    #[test]
    fn test_default_codes_nonempty_and_ordered() {
        assert!(!DEFAULT_CODES.is_empty());
        assert_eq!(DEFAULT_CODES[0], "TEST");
        assert!(DEFAULT_CODES.contains(&"FREESHIPPING"));
    }
}
