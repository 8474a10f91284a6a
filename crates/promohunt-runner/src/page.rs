//! The checkout page seam — everything the runner does to a page goes
//! through this trait, so runs are testable against a scripted double.

use crate::{Error, Result};
use async_trait::async_trait;
use eoka::Page;
use promohunt_locator::PageSnapshot;

/// DOM operations the runner needs. All selector-taking methods treat a
/// missing element as an error; the runner catches those per attempt.
#[async_trait]
pub trait CheckoutPage: Send + Sync {
    /// Take a fresh snapshot of the page's inputs and buttons.
    async fn snapshot(&self) -> Result<PageSnapshot>;

    /// Set an input's value and dispatch bubbling `input`/`change` events
    /// so page-level listeners observe the change.
    async fn set_value(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Dispatch a cancelable `submit` event on a form.
    async fn submit_form(&self, selector: &str) -> Result<()>;

    /// Focus an input and synthesize a keydown/keypress/keyup Enter
    /// sequence on it.
    async fn press_enter(&self, selector: &str) -> Result<()>;

    /// Cosmetic outline on the field being driven.
    async fn highlight(&self, selector: &str) -> Result<()>;

    /// Remove the cosmetic outline.
    async fn clear_highlight(&self, selector: &str) -> Result<()>;

    /// Visible text of the page, for the success scan.
    async fn visible_text(&self) -> Result<String>;
}

/// Live implementation over an eoka CDP page.
pub struct LiveCheckout<'a> {
    page: &'a Page,
}

impl<'a> LiveCheckout<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Run a snippet that returns `false` when its target element is gone.
    async fn eval_on_element(&self, js: String, selector: &str, what: &str) -> Result<()> {
        let found: bool = self.page.evaluate(&js).await?;
        if !found {
            return Err(Error::Probe(format!("{} target '{}' not found", what, selector)));
        }
        Ok(())
    }
}

#[async_trait]
impl CheckoutPage for LiveCheckout<'_> {
    async fn snapshot(&self) -> Result<PageSnapshot> {
        Ok(promohunt_locator::snapshot(self.page).await?)
    }

    async fn set_value(&self, selector: &str, value: &str) -> Result<()> {
        let arg = serde_json::json!({ "sel": selector, "val": value });
        let js = format!(
            r#"(() => {{
                const arg = {arg};
                const el = document.querySelector(arg.sel);
                if (!el) return false;
                el.value = arg.val;
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            arg = serde_json::to_string(&arg).unwrap()
        );
        self.eval_on_element(js, selector, "fill").await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.page.click(selector).await?;
        Ok(())
    }

    async fn submit_form(&self, selector: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const form = document.querySelector({sel});
                if (!form) return false;
                form.dispatchEvent(new Event('submit', {{ bubbles: true, cancelable: true }}));
                return true;
            }})()"#,
            sel = serde_json::to_string(selector).unwrap()
        );
        self.eval_on_element(js, selector, "submit").await
    }

    async fn press_enter(&self, selector: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.focus();
                for (const type of ['keydown', 'keypress', 'keyup']) {{
                    el.dispatchEvent(new KeyboardEvent(type, {{
                        key: 'Enter', code: 'Enter', keyCode: 13, which: 13,
                        bubbles: true, cancelable: true
                    }}));
                }}
                return true;
            }})()"#,
            sel = serde_json::to_string(selector).unwrap()
        );
        self.eval_on_element(js, selector, "enter").await
    }

    async fn highlight(&self, selector: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (el) {{
                    el.style.outline = '2px solid #4caf50';
                    el.style.outlineOffset = '1px';
                }}
            }})()"#,
            sel = serde_json::to_string(selector).unwrap()
        );
        self.page.execute(&js).await?;
        Ok(())
    }

    async fn clear_highlight(&self, selector: &str) -> Result<()> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (el) {{
                    el.style.outline = '';
                    el.style.outlineOffset = '';
                }}
            }})()"#,
            sel = serde_json::to_string(selector).unwrap()
        );
        self.page.execute(&js).await?;
        Ok(())
    }

    async fn visible_text(&self) -> Result<String> {
        Ok(self.page.text().await?)
    }
}
