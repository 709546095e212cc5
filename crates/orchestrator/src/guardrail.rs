//! Off-topic guardrail.

/// Words that mark a message as about SkyPay, matched as lowercase substrings.
pub const DOMAIN_KEYWORDS: [&str; 10] = [
    "skypay",
    "skybridge",
    "payment",
    "bills",
    "loan",
    "support",
    "office",
    "scam",
    "legit",
    "money",
];

/// Whether `text` mentions any domain keyword, case-insensitively.
pub fn mentions_domain(text: &str) -> bool {
    let lowered = text.to_lowercase();
    DOMAIN_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Whether a message should be refused as off-topic without generation.
///
/// Fires only when nothing was retrieved, no keyword is present, and the
/// conversation is still inside its grace window (`prior_messages` counts
/// every stored message before the new one).
pub fn is_off_topic(text: &str, context: &str, prior_messages: usize, grace_turns: usize) -> bool {
    context.is_empty() && !mentions_domain(text) && prior_messages < grace_turns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_case_insensitive_substring() {
        assert!(mentions_domain("How do I pay my BILLS?"));
        assert!(mentions_domain("is this legitimate"));
        assert!(mentions_domain("Payments are late"));
        assert!(!mentions_domain("What is the capital of France?"));
    }

    #[test]
    fn test_guardrail_conditions() {
        // Fresh conversation, unrelated, nothing retrieved
        assert!(is_off_topic("Tell me a joke", "", 1, 3));
        // Context retrieved
        assert!(!is_off_topic("Tell me a joke", "SkyPay line", 1, 3));
        // Keyword present
        assert!(!is_off_topic("Tell me a joke about money", "", 1, 3));
        // Past the grace window
        assert!(!is_off_topic("Tell me a joke", "", 3, 3));
        assert!(is_off_topic("Tell me a joke", "", 2, 3));
    }
}
