//! DOM probe — serializes the page's inputs and buttons for classification.

use eoka::{Page, Result};

use crate::PageSnapshot;

/// JavaScript that walks the document and returns the snapshot as JSON.
///
/// Visibility is computed here because it needs layout: computed style
/// plus the offsetParent check. Everything downstream treats the result
/// as plain data.
const PROBE_JS: &str = r#"
(() => {
    const visible = (el) => {
        const style = getComputedStyle(el);
        return style.display !== 'none' &&
               style.visibility !== 'hidden' &&
               el.offsetParent !== null;
    };

    // Associated label text: label[for=], ancestor <label>, aria-labelledby.
    const labelText = (el) => {
        let text = '';
        if (el.id) {
            const label = document.querySelector('label[for=' + JSON.stringify(el.id) + ']');
            if (label) text += ' ' + label.textContent;
        }
        const parentLabel = el.closest('label');
        if (parentLabel) text += ' ' + parentLabel.textContent;
        const ref = el.getAttribute('aria-labelledby');
        if (ref) {
            const lbl = document.getElementById(ref);
            if (lbl) text += ' ' + lbl.textContent;
        }
        return text.replace(/\s+/g, ' ').trim();
    };

    // Surrounding text: parent plus two more ancestor levels. Parent text
    // already contains sibling text. Capped so giant containers stay cheap.
    const nearbyText = (el) => {
        let text = '';
        let node = el.parentElement;
        for (let depth = 0; node && node !== document.body && depth < 3; depth++) {
            text += ' ' + (node.textContent || '');
            node = node.parentElement;
        }
        return text.replace(/\s+/g, ' ').trim().slice(0, 500);
    };

    // Unique selector: id, then name, then an nth-of-type path.
    const selectorFor = (el) => {
        if (el.id) return '#' + CSS.escape(el.id);
        const tag = el.tagName.toLowerCase();
        if (el.name) return tag + '[name=' + JSON.stringify(el.name) + ']';
        const parts = [];
        let node = el;
        while (node && node !== document.body && parts.length < 5) {
            let s = node.tagName.toLowerCase();
            if (node.id) {
                parts.unshift('#' + CSS.escape(node.id));
                break;
            }
            const parent = node.parentElement;
            if (parent) {
                const siblings = Array.from(parent.children).filter(c => c.tagName === node.tagName);
                if (siblings.length > 1) {
                    s += ':nth-of-type(' + (siblings.indexOf(node) + 1) + ')';
                }
            }
            parts.unshift(s);
            node = parent;
        }
        return parts.join(' > ');
    };

    const formInfo = (el) => {
        const form = el.form;
        if (!form) return null;
        const submit = form.querySelector('button[type="submit"], input[type="submit"]');
        return {
            selector: selectorFor(form),
            submit_selector: submit && visible(submit) ? selectorFor(submit) : null,
        };
    };

    const fields = Array.from(document.getElementsByTagName('input')).map((el, i) => ({
        index: i,
        id: el.id || '',
        name: el.getAttribute('name') || '',
        placeholder: el.getAttribute('placeholder') || '',
        aria_label: el.getAttribute('aria-label') || '',
        input_type: el.getAttribute('type') || 'text',
        data_attrs: Array.from(el.attributes)
            .filter(a => a.name.startsWith('data-'))
            .map(a => a.name),
        label_text: labelText(el),
        nearby_text: nearbyText(el),
        visible: visible(el),
        selector: selectorFor(el),
        form: formInfo(el),
    }));

    const buttons = Array.from(
        document.querySelectorAll('button, input[type="button"], [role="button"]')
    ).map((el, i) => ({
        index: i,
        text: ((el.textContent || el.value || '').trim()).replace(/\s+/g, ' ').slice(0, 120),
        visible: visible(el),
        selector: selectorFor(el),
    }));

    return JSON.stringify({ fields, buttons });
})()
"#;

/// Run the probe and return the parsed snapshot.
pub async fn snapshot(page: &Page) -> Result<PageSnapshot> {
    let json: String = page.evaluate(PROBE_JS).await?;
    serde_json::from_str(&json)
        .map_err(|e| eoka::Error::CdpSimple(format!("snapshot parse error: {}", e)))
}
