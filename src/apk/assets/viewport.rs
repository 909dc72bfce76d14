//! Mobile viewport injection for site markup.
//!
//! Every `.html` file with a `<head>` element and no viewport meta tag gets
//! the configured tag inserted right after the first `<head>` opening tag.
//! Files that already declare a viewport are returned byte-identical, which
//! makes the rewrite idempotent.

use crate::apk::assets::AssetTree;
use regex::Regex;
use std::sync::LazyLock;

static HEAD_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<head(?:\s[^>]*)?>").expect("static regex")
});

static VIEWPORT_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*\bname\s*=\s*["']?viewport\b"#).expect("static regex")
});

/// Whether `markup` already declares a viewport meta tag.
pub fn declares_viewport(markup: &str) -> bool {
    VIEWPORT_META.is_match(markup)
}

/// Rewrite every markup file of `tree`. Other files pass through untouched.
pub fn inject(tree: AssetTree, viewport_tag: &str) -> AssetTree {
    tree.map_files(|path, bytes| {
        if path.ends_with(".html") {
            inject_markup(bytes, viewport_tag)
        } else {
            bytes
        }
    })
}

/// Insert `viewport_tag` into one markup document if it needs one.
///
/// Invalid UTF-8 sequences are dropped from a document that gets rewritten.
/// A document that is left alone keeps its exact bytes.
pub fn inject_markup(bytes: Vec<u8>, viewport_tag: &str) -> Vec<u8> {
    let text = decode_lossy(&bytes);
    if declares_viewport(&text) {
        return bytes;
    }
    let Some(head) = HEAD_OPEN.find(&text) else {
        return bytes;
    };

    let mut out = String::with_capacity(text.len() + viewport_tag.len() + 5);
    out.push_str(&text[..head.end()]);
    out.push_str("\n    ");
    out.push_str(viewport_tag);
    out.push_str(&text[head.end()..]);
    out.into_bytes()
}

fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
