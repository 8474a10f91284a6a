use clap::Parser;
use promohunt_runner::{Config, LiveCheckout, PromoRunner, RunEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "promohunt-runner")]
#[command(about = "Test promo codes against a checkout page")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> promohunt_runner::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = Config::load(&cli.config)?;

    if cli.check {
        println!("Config valid: {}", config.name);
        println!("  Target: {}", config.target.url);
        println!("  Codes: {}", config.codes.len());
        println!("  Delay: {}ms", config.delay_ms);
        if config.detect_success {
            println!("  Success scan: on");
        }
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }

    println!("Running: {}", config.name);

    let browser = eoka::Browser::launch_with_config(config.browser.stealth()).await?;
    let page = browser.new_page("about:blank").await?;
    page.goto(&config.target.url).await?;

    let (events, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let runner = Arc::new(PromoRunner::from_config(&config, events));

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("  {}", event);
            if !matches!(event, RunEvent::Progress { .. }) {
                break;
            }
        }
    });

    // Ctrl-C maps to a cooperative stop; the run winds down within one
    // delay interval.
    {
        let runner = runner.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                runner.stop();
            }
        });
    }

    let result = runner.run(&LiveCheckout::new(&page)).await;
    let _ = printer.await;

    let summary = match result {
        Ok(Some(summary)) => summary,
        Ok(None) => {
            // Another run already owned this runner; nothing to report.
            browser.close().await?;
            return Ok(());
        }
        Err(e) => {
            browser.close().await?;
            return Err(e);
        }
    };

    println!();
    if summary.stopped {
        println!("✗ Stopped after {} codes", summary.attempted);
    } else {
        println!("✓ Completed ({} codes)", summary.attempted);
    }
    if !summary.successful_codes.is_empty() {
        println!("  Looked successful: {}", summary.successful_codes.join(", "));
    }
    println!("  Duration: {}ms", summary.duration_ms);

    browser.close().await?;

    if summary.stopped {
        std::process::exit(130);
    }

    Ok(())
}
