//! Submit control resolution for a located promo input.

use crate::{InputField, PageSnapshot};

/// Button text that marks a code-submission control.
const SUBMIT_TERMS: &[&str] = &["apply", "submit", "ok", "verify", "check", "redeem"];

/// How to submit the code once the input holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPlan {
    /// Click this button.
    Click(String),
    /// No button found: dispatch a `submit` event on this form.
    FormEvent(String),
    /// No button and no form: synthesize an Enter key sequence on the input.
    EnterKey,
}

/// Find a submit control for the given input.
///
/// The input's own form wins: its native submit control (when visible at
/// snapshot time) is used before any page-wide scan. The fallback scan
/// takes the first visible button-like element, in document order, whose
/// text contains a submission term.
pub fn find_submit<'a>(snap: &'a PageSnapshot, field: &'a InputField) -> Option<&'a str> {
    if let Some(form) = &field.form {
        if let Some(selector) = &form.submit_selector {
            return Some(selector);
        }
    }

    snap.buttons
        .iter()
        .filter(|b| b.visible)
        .find(|b| {
            let text = b.text.to_lowercase();
            SUBMIT_TERMS.iter().any(|term| text.contains(term))
        })
        .map(|b| b.selector.as_str())
}

/// Fold the resolver and its fallbacks into a single plan.
pub fn submit_plan(snap: &PageSnapshot, field: &InputField) -> SubmitPlan {
    if let Some(selector) = find_submit(snap, field) {
        return SubmitPlan::Click(selector.to_owned());
    }
    if let Some(form) = &field.form {
        return SubmitPlan::FormEvent(form.selector.clone());
    }
    SubmitPlan::EnterKey
}
