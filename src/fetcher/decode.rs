use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

// Only the head of the document is searched for <meta> declarations.
const SNIFF_WINDOW: usize = 4096;

/// Decode a response body to UTF-8.
///
/// Encoding is taken from the Content-Type header, then from a `<meta>`
/// declaration near the top of the document, then guessed statistically.
/// Malformed sequences become U+FFFD instead of failing the fetch.
pub fn decode_body(content_type: &str, body: &[u8]) -> (String, &'static str) {
    let encoding = sniff_encoding(content_type, body);
    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        warn!("Body contained byte sequences invalid in {}", used.name());
    }
    (decoded.into_owned(), used.name())
}

fn sniff_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_from(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let head = &body[..body.len().min(SNIFF_WINDOW)];
    let head_text = String::from_utf8_lossy(head);
    // covers both <meta charset=..> and the http-equiv content=".. charset=.." form
    if let Some(encoding) = label_from(&META_CHARSET, &head_text) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, body.len() <= SNIFF_WINDOW);
    detector.guess(None, true)
}

fn label_from(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
