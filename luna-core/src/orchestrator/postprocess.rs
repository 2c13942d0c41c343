//! Response post-processing: whitespace normalization and banned-phrase
//! removal (design §4.6 step 8, §8 idempotence law `P(P(x)) == P(x)`).

use crate::personality::VoiceProfile;

/// Normalize whitespace and strip the voice profile's banned phrases.
/// Idempotent: re-running on its own output is a no-op.
#[must_use]
pub fn post_process(text: &str, voice: &VoiceProfile) -> String {
    let mut normalized: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    for phrase in &voice.banned_phrases {
        if phrase.is_empty() {
            continue;
        }
        normalized = normalized.replace(phrase.as_str(), "");
    }

    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_repeated_whitespace() {
        let voice = VoiceProfile::default();
        assert_eq!(post_process("hi   there\n\nfriend", &voice), "hi there friend");
    }

    #[test]
    fn strips_banned_phrases() {
        let voice = VoiceProfile { banned_phrases: vec!["as an AI".to_string()], ..VoiceProfile::default() };
        assert_eq!(post_process("Well, as an AI I think so.", &voice), "Well, I think so.");
    }

    #[test]
    fn is_idempotent() {
        let voice = VoiceProfile { banned_phrases: vec!["filler".to_string()], ..VoiceProfile::default() };
        let once = post_process("some filler   text", &voice);
        let twice = post_process(&once, &voice);
        assert_eq!(once, twice);
    }
}
