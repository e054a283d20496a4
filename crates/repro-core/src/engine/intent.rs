//! Greeting and closing detection, checked before any topic matching.

use serde::Serialize;

const GREETING_CUES: [&str; 4] = ["hello", "hi", "hey", "greetings"];
const CLOSING_CUES: [&str; 4] = ["thank", "thanks", "bye", "goodbye"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Closing,
}

/// Greeting wins over closing when both are present.
pub fn classify_intent(utterance: &str) -> Option<Intent> {
    let normalized = utterance.to_lowercase();
    if contains_cue(&normalized, &GREETING_CUES) {
        Some(Intent::Greeting)
    } else if contains_cue(&normalized, &CLOSING_CUES) {
        Some(Intent::Closing)
    } else {
        None
    }
}

/// Plain substring containment on the lowercased text, so "hi" also fires inside "this".
fn contains_cue(normalized: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| normalized.contains(cue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_words_are_detected() {
        assert_eq!(classify_intent("Hello"), Some(Intent::Greeting));
        assert_eq!(classify_intent("hey, quick question"), Some(Intent::Greeting));
        assert_eq!(classify_intent("Greetings from Ithaca"), Some(Intent::Greeting));
    }

    #[test]
    fn cue_inside_another_word_still_counts() {
        assert_eq!(classify_intent("What is this?"), Some(Intent::Greeting));
        assert_eq!(classify_intent("Which archive should I use?"), Some(Intent::Greeting));
        assert_eq!(classify_intent("thankyou"), Some(Intent::Closing));
        assert_eq!(classify_intent("Goodbyes are hard"), Some(Intent::Closing));
    }

    #[test]
    fn closing_words_are_detected() {
        assert_eq!(classify_intent("Thanks!"), Some(Intent::Closing));
        assert_eq!(classify_intent("ok thank you"), Some(Intent::Closing));
        assert_eq!(classify_intent("Bye"), Some(Intent::Closing));
    }

    #[test]
    fn greeting_is_checked_before_closing() {
        assert_eq!(classify_intent("hi and thanks"), Some(Intent::Greeting));
    }

    #[test]
    fn plain_questions_have_no_intent() {
        assert_eq!(classify_intent(""), None);
        assert_eq!(classify_intent("How do I make my Stata code reproducible?"), None);
        assert_eq!(classify_intent("I need a README for my dataset"), None);
    }
}
