//! Integration tests for promohunt
//!
//! These tests require Chrome to be installed and available.
//! Run with: cargo test --test integration -- --ignored

use promohunt::{locate, snapshot, submit_plan, Browser, LiveCheckout, PromoRunner, RunEvent, SubmitPlan};
use std::sync::Arc;
use std::time::Duration;

/// Check if Chrome is available
fn chrome_available() -> bool {
    eoka::stealth::patcher::find_chrome().is_ok()
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_locate_on_rendered_checkout() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("about:blank")
        .await
        .expect("Failed to create page");

    page.goto(
        r##"data:text/html,
        <style>body { margin: 0; padding: 20px; }</style>
        <input type="email" name="email" placeholder="Email">
        <label for="code">Discount code</label>
        <input id="code" type="text">
        <button>Apply</button>
    "##,
    )
    .await
    .expect("Failed to navigate");

    let snap = snapshot(&page).await.expect("Failed to snapshot");
    assert_eq!(snap.len(), 2);

    let field = locate(&snap).expect("promo field not found");
    assert_eq!(field.selector, "#code");
    assert_eq!(field.label_text, "Discount code");

    match submit_plan(&snap, field) {
        SubmitPlan::Click(selector) => {
            assert!(selector.contains("button"), "selector: {}", selector)
        }
        other => panic!("expected a button click plan, got {:?}", other),
    }

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_hidden_fields_are_skipped_live() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("about:blank")
        .await
        .expect("Failed to create page");

    page.goto(
        r##"data:text/html,
        <style>body { margin: 0; padding: 20px; }</style>
        <input id="promo-hidden" placeholder="Promo code" style="display: none">
        <input id="coupon" placeholder="Coupon code">
    "##,
    )
    .await
    .expect("Failed to navigate");

    let snap = snapshot(&page).await.expect("Failed to snapshot");
    assert_eq!(snap.len(), 2);
    assert!(!snap.fields[0].visible);

    let field = locate(&snap).expect("visible field not found");
    assert_eq!(field.selector, "#coupon");

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_run_fills_the_field_live() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("about:blank")
        .await
        .expect("Failed to create page");

    page.goto(
        r##"data:text/html,
        <style>body { margin: 0; padding: 20px; }</style>
        <label for="code">Promo code</label>
        <input id="code" type="text">
        <button>Apply</button>
    "##,
    )
    .await
    .expect("Failed to navigate");

    let (events, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let runner = Arc::new(PromoRunner::new(
        vec!["FIRST10".into(), "SECOND20".into()],
        Duration::from_millis(100),
        None,
        events,
    ));

    let live = LiveCheckout::new(&page);
    let summary = runner
        .run(&live)
        .await
        .expect("run failed")
        .expect("run did not start");
    assert!(!summary.stopped);
    assert_eq!(summary.attempted, 2);

    let mut got = Vec::new();
    while let Ok(event) = rx.try_recv() {
        got.push(event);
    }
    assert_eq!(
        got.last(),
        Some(&RunEvent::Completed {
            successful_codes: vec![]
        })
    );

    // The last code stays in the field after the run.
    let value: String = page
        .evaluate("document.getElementById('code').value")
        .await
        .expect("Failed to read value");
    assert_eq!(value, "SECOND20");

    browser.close().await.expect("Failed to close browser");
}
