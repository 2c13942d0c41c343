//! Input validation/sanitization (design §4.6 step 1, §7 `InputValidation`
//! policy: sanitize and continue, never abort).

const MAX_INPUT_LEN: usize = 4000;

/// Trim, strip control characters, and cap length. Never returns an error:
/// sanitization always succeeds by construction.
#[must_use]
pub fn sanitize_input(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_control() || *c == '\n').collect();
    let trimmed = stripped.trim();
    trimmed.chars().take(MAX_INPUT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_control_characters() {
        let sanitized = sanitize_input("hi\u{0007}there");
        assert_eq!(sanitized, "hithere");
    }

    #[test]
    fn caps_length() {
        let long = "a".repeat(MAX_INPUT_LEN + 100);
        assert_eq!(sanitize_input(&long).len(), MAX_INPUT_LEN);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_input("  hi  "), "hi");
    }
}
