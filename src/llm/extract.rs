//! JSON extraction from free-text model output.
//!
//! Models are asked to respond with JSON only, but they routinely wrap it in
//! prose or code fences. The response is untrusted text; this scanner pulls
//! out the first balanced-brace object, tracking string and escape state so
//! braces inside JSON strings do not confuse the depth count.

/// Returns the first well-formed `{...}` object in `text`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
