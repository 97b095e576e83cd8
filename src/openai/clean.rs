use std::sync::LazyLock;

use regex::{Captures, Regex};

static UNICODE_SURROGATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\u([dD][89abAB][0-9a-fA-F]{2})\\u([dD][c-fC-F][0-9a-fA-F]{2})")
        .expect("valid regex")
});

static UNICODE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("valid regex"));

/// A parenthetical wrapping a markdown link, e.g. `([example.com](https://example.com))`
/// or `(see [here](https://x.cz))`.
static WRAPPED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^()\[\]]*\[[^\]]+\]\([^)]+\)[^()]*\)").expect("valid regex")
});

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]+\)").expect("valid regex"));

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("valid regex"));

static DOMAIN_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\.(?:com|cz|eu)[^)]*\)").expect("valid regex"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,])").expect("valid regex"));

/// Turns model output into display text.
///
/// Steps run in a fixed order: escape decoding, link and URL removal,
/// newline collapsing, quote unescaping, punctuation tidying, trimming.
/// Text without escapes, links or blank-line runs only gets trimmed.
///
/// Each unescape runs once, so doubly escaped input (`\\'`) loses one level
/// per call and is not idempotent.
pub fn clean_text(text: &str) -> String {
    let text = decode_unicode_escapes(text);
    let text = text.replace("\\n", "\n");
    let text = WRAPPED_LINK.replace_all(&text, "");
    let text = MARKDOWN_LINK.replace_all(&text, "");
    let text = BARE_URL.replace_all(&text, "");
    let text = DOMAIN_PARENTHETICAL.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = text.replace("\\\"", "\"").replace("\\'", "'");
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    text.trim().to_string()
}

fn decode_unicode_escapes(text: &str) -> String {
    let text = UNICODE_SURROGATE_PAIR.replace_all(text, |caps: &Captures| {
        let high = u32::from_str_radix(&caps[1], 16).unwrap_or_default();
        let low = u32::from_str_radix(&caps[2], 16).unwrap_or_default();
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    UNICODE_ESCAPE
        .replace_all(&text, |caps: &Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                // Lone surrogates have no char; keep the escape text.
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
