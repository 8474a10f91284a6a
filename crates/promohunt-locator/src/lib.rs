//! # promohunt-locator
//!
//! Checkout page observation. Snapshot a page's form elements into plain
//! data, then classify which input is the promo-code field and which
//! control submits it. Classification is pure Rust over the snapshot, so
//! it runs (and is tested) without a browser.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promohunt_locator::{locate, submit_plan, snapshot};
//!
//! # #[tokio::main]
//! # async fn main() -> eoka::Result<()> {
//! let browser = eoka::Browser::launch().await?;
//! let page = browser.new_page("https://shop.example/checkout").await?;
//!
//! let snap = snapshot(&page).await?;
//! if let Some(field) = locate(&snap) {
//!     println!("promo input: {}", field.selector);
//!     println!("submit via: {:?}", submit_plan(&snap, field));
//! }
//! # Ok(())
//! # }
//! ```

mod locate;
mod probe;
mod submit;

pub use locate::locate;
pub use probe::snapshot;
pub use submit::{find_submit, submit_plan, SubmitPlan};

use std::fmt;

use serde::Deserialize;

/// A text input captured from the page, with everything the classifier
/// needs to decide whether it is the promo-code field.
///
/// Missing attributes deserialize as empty strings; the classifier never
/// distinguishes "absent" from "empty".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputField {
    /// Document-order index among captured inputs.
    pub index: usize,
    /// `id` attribute.
    #[serde(default)]
    pub id: String,
    /// `name` attribute.
    #[serde(default)]
    pub name: String,
    /// `placeholder` attribute.
    #[serde(default)]
    pub placeholder: String,
    /// `aria-label` attribute.
    #[serde(default)]
    pub aria_label: String,
    /// `type` attribute ("text" when unset).
    #[serde(default)]
    pub input_type: String,
    /// Names of all `data-*` attributes on the element.
    #[serde(default)]
    pub data_attrs: Vec<String>,
    /// Associated label text: `label[for=]`, ancestor `<label>`, and
    /// `aria-labelledby` reference, concatenated.
    #[serde(default)]
    pub label_text: String,
    /// Text surrounding the element: parent and up to two ancestor levels.
    #[serde(default)]
    pub nearby_text: String,
    /// Visibility at snapshot time: computed display/visibility plus a
    /// non-null offsetParent.
    #[serde(default)]
    pub visible: bool,
    /// Unique CSS selector for this element.
    #[serde(default)]
    pub selector: String,
    /// Enclosing form, if any.
    #[serde(default)]
    pub form: Option<FormInfo>,
}

/// The form an input belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct FormInfo {
    /// Selector for the form element itself.
    pub selector: String,
    /// Selector for the form's native submit control, if one exists and
    /// was visible at snapshot time.
    #[serde(default)]
    pub submit_selector: Option<String>,
}

/// A button-like element: `<button>`, button-typed `<input>`, or anything
/// carrying `role="button"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ButtonLike {
    /// Document-order index among captured button-like elements.
    pub index: usize,
    /// Visible text (text content, or `value` for input buttons).
    #[serde(default)]
    pub text: String,
    /// Visibility at snapshot time.
    #[serde(default)]
    pub visible: bool,
    /// Unique CSS selector for this element.
    #[serde(default)]
    pub selector: String,
}

/// One observation of the page: every input and button-like element,
/// in document order. Valid only for the DOM it was taken from; pages
/// re-render, so take a fresh snapshot before every use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSnapshot {
    pub fields: Vec<InputField>,
    pub buttons: Vec<ButtonLike>,
}

impl PageSnapshot {
    /// Number of captured inputs.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no inputs were captured.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] <input", self.index)?;
        if !self.input_type.is_empty() && self.input_type != "text" {
            write!(f, " type=\"{}\"", self.input_type)?;
        }
        if !self.name.is_empty() {
            write!(f, " name=\"{}\"", self.name)?;
        }
        f.write_str(">")?;
        if !self.label_text.is_empty() {
            write!(f, " label=\"{}\"", self.label_text)?;
        }
        if !self.placeholder.is_empty() {
            write!(f, " placeholder=\"{}\"", self.placeholder)?;
        }
        if !self.visible {
            f.write_str(" [hidden]")?;
        }
        Ok(())
    }
}
