//! Promo-code field classification.
//!
//! Three tiers, each exhausted before the next is tried: known platform
//! conventions, then the input's own attributes and labels, then the text
//! around it. Exclusion terms always override inclusion terms.

use crate::{InputField, PageSnapshot};

/// Known discount-field conventions, checked one rule at a time across
/// the whole page. Shopify covers most hosted checkouts.
enum PlatformRule {
    Id(&'static str),
    Name(&'static str),
    DataAttr(&'static str),
}

const PLATFORM_RULES: &[PlatformRule] = &[
    PlatformRule::Id("discount"),
    PlatformRule::Name("discount"),
    PlatformRule::DataAttr("data-discount-field"),
    PlatformRule::Id("checkout_reduction_code"),
];

/// Terms that disqualify an input no matter what else matches.
const EXCLUDE_TERMS: &[&str] = &[
    "post", "postal", "zip", "postcode", "email", "phone", "address", "search", "password",
];

/// Multi-word inclusion terms. Scanned across all fields before the
/// single-word pass runs, so a later phrase match beats an earlier
/// word-only match.
const PHRASE_TERMS: &[&str] = &[
    "discount code",
    "promo code",
    "promotional code",
    "coupon code",
    "voucher code",
    "gift card",
];

/// Single-word inclusion terms.
const WORD_TERMS: &[&str] = &["discount", "promo", "coupon", "voucher", "gift"];

/// Input types that can never hold a typed code.
const NON_TEXT_TYPES: &[&str] = &[
    "checkbox", "radio", "button", "submit", "reset", "file", "image", "range", "color", "hidden",
];

/// Find the most likely promo-code input in a snapshot.
///
/// Deterministic for a given snapshot and never panics on sparse markup.
/// Returns `None` when nothing on the page looks like a code field.
pub fn locate(snap: &PageSnapshot) -> Option<&InputField> {
    if let Some(field) = platform_match(snap) {
        return Some(field);
    }
    if let Some(field) = attribute_match(snap) {
        return Some(field);
    }
    nearby_match(snap)
}

fn platform_match(snap: &PageSnapshot) -> Option<&InputField> {
    for rule in PLATFORM_RULES {
        let hit = snap.fields.iter().filter(|f| f.visible).find(|f| match rule {
            PlatformRule::Id(id) => f.id == *id,
            PlatformRule::Name(name) => f.name == *name,
            PlatformRule::DataAttr(attr) => f.data_attrs.iter().any(|a| a == attr),
        });
        if hit.is_some() {
            return hit;
        }
    }
    None
}

fn attribute_match(snap: &PageSnapshot) -> Option<&InputField> {
    ranked_match(snap, |field| attribute_blob(field))
}

fn nearby_match(snap: &PageSnapshot) -> Option<&InputField> {
    // A field whose own attributes hit an exclusion term stays rejected
    // here too; surrounding text cannot rehabilitate it.
    ranked_match(snap, |field| {
        format!("{} {}", attribute_blob(field), field.nearby_text.to_lowercase())
    })
}

/// Exclude-then-include over a blob, phrase pass before word pass.
fn ranked_match<'a>(
    snap: &'a PageSnapshot,
    blob_of: impl Fn(&InputField) -> String,
) -> Option<&'a InputField> {
    let candidates: Vec<(&InputField, String)> = snap
        .fields
        .iter()
        .filter(|f| f.visible && accepts_text(f))
        .map(|f| (f, blob_of(f)))
        .filter(|(_, blob)| !EXCLUDE_TERMS.iter().any(|term| blob.contains(term)))
        .collect();

    for terms in [PHRASE_TERMS, WORD_TERMS] {
        let hit = candidates
            .iter()
            .find(|(_, blob)| terms.iter().any(|term| blob.contains(term)))
            .map(|(field, _)| *field);
        if hit.is_some() {
            return hit;
        }
    }
    None
}

fn accepts_text(field: &InputField) -> bool {
    let ty = field.input_type.to_lowercase();
    !NON_TEXT_TYPES.contains(&ty.as_str())
}

/// The input's own identity, lowercased: placeholder, name, id,
/// aria-label, associated label text, and type.
fn attribute_blob(field: &InputField) -> String {
    format!(
        "{} {} {} {} {} {}",
        field.placeholder, field.name, field.id, field.aria_label, field.label_text,
        field.input_type
    )
    .to_lowercase()
}
