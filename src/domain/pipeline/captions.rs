//! Caption list extraction from step output

/// Parse `output` as a JSON array of strings, tolerating a surrounding
/// markdown code fence. Returns None for anything else.
pub fn extract_captions(output: &str) -> Option<Vec<String>> {
    let trimmed = output.trim();
    let body = strip_code_fence(trimmed).unwrap_or(trimmed);

    serde_json::from_str::<Vec<String>>(body).ok()
}

fn strip_code_fence(text: &str) -> Option<&str> {
    if !text.starts_with("```") {
        return None;
    }

    let (_, after_header) = text.split_once('\n')?;
    Some(after_header.strip_suffix("\n```").unwrap_or(after_header))
}
