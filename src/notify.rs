//! On-page toast notifications — injected, auto-fading, cosmetic only.

use eoka::{Page, Result};

/// Show the green completion toast.
pub async fn show_completed(page: &Page) -> Result<()> {
    show_toast(page, "Testing completed!", "#4CAF50").await
}

/// Show the red stopped toast.
pub async fn show_stopped(page: &Page) -> Result<()> {
    show_toast(page, "Testing stopped", "#f44336").await
}

/// Inject a fixed toast in the top-right corner; it fades out and removes
/// itself after a few seconds.
async fn show_toast(page: &Page, text: &str, background: &str) -> Result<()> {
    let arg = serde_json::json!({ "text": text, "bg": background });
    let js = format!(
        r#"(() => {{
            const arg = {arg};
            const note = document.createElement('div');
            note.textContent = arg.text;
            Object.assign(note.style, {{
                position: 'fixed',
                top: '20px',
                right: '20px',
                padding: '15px 25px',
                backgroundColor: arg.bg,
                color: 'white',
                borderRadius: '5px',
                zIndex: '2147483647',
                boxShadow: '0 2px 5px rgba(0,0,0,0.2)',
                fontSize: '16px',
                fontWeight: 'bold',
                transition: 'opacity 0.5s'
            }});
            document.body.appendChild(note);
            setTimeout(() => {{
                note.style.opacity = '0';
                setTimeout(() => note.remove(), 500);
            }}, 3000);
        }})()"#,
        arg = serde_json::to_string(&arg).unwrap()
    );
    page.execute(&js).await
}
