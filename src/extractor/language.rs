use whatlang::Detector;

const MIN_TEXT_LENGTH: usize = 50;
const MIN_CONFIDENCE: f64 = 0.25;

/// ISO 639-3 code of the text's language, if it can be told with some
/// confidence.
pub fn detect_language(text: &str) -> Option<String> {
    if text.trim().len() < MIN_TEXT_LENGTH {
        return None;
    }

    Detector::new()
        .detect(text)
        .filter(|info| info.is_reliable() || info.confidence() >= MIN_CONFIDENCE)
        .map(|info| info.lang().code().to_string())
}

pub fn is_english(code: Option<&str>) -> bool {
    matches!(code, None | Some("eng"))
}
