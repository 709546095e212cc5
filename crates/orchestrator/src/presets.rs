//! Canned answers for the FAQ buttons.

/// Question and answer pairs, in the order the FAQ list shows them.
pub const PRESET_ANSWERS: [(&str, &str); 6] = [
    (
        "What is SkyPay?",
        "SkyPay is a Philippines-based fintech company specializing in payment gateway services. We connect merchants, financial institutions, and billers.",
    ),
    (
        "Is SkyPay a scam?",
        "No, SkyPay is a legitimate, BSP-licensed fintech firm and SEC-registered company.",
    ),
    (
        "What are SkyPay office hours?",
        "Our office hours are Monday to Friday: 9:00 AM to 6:00 PM Philippine Standard Time.",
    ),
    (
        "What are SkyPay's services?",
        "We offer OTC and Digital Collections, Cash Payouts, Bill Payments (200+ partners), and Disbursement via InstaPay/PESONet.",
    ),
    (
        "How do I contact SkyPay support?",
        "Email us at cs@skypay.ph for any payment-related concerns.",
    ),
    (
        "Is SkyPay a loaning company?",
        "No, SkyPay is a payment solution provider. We facilitate payments for third-party lenders but do not issue loans ourselves.",
    ),
];

/// Exact-match lookup table from question text to canned answer.
#[derive(Debug, Clone)]
pub struct PresetTable {
    entries: Vec<(String, String)>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::new(
            PRESET_ANSWERS
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string())),
        )
    }
}

impl PresetTable {
    /// Build a table from question and answer pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Canned answer for `text`.
    ///
    /// Byte-for-byte comparison: no trimming, no case folding.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(question, _)| question == text)
            .map(|(_, answer)| answer.as_str())
    }

    /// Questions in display order.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(question, _)| question.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let table = PresetTable::default();
        assert_eq!(
            table.lookup("Is SkyPay a scam?"),
            Some("No, SkyPay is a legitimate, BSP-licensed fintech firm and SEC-registered company.")
        );
    }

    #[test]
    fn test_variants_fall_through() {
        let table = PresetTable::default();
        assert!(table.lookup("what is skypay?").is_none());
        assert!(table.lookup("What is SkyPay? ").is_none());
        assert!(table.lookup(" What is SkyPay?").is_none());
        assert!(table.lookup("What is SkyPay").is_none());
    }

    #[test]
    fn test_questions_in_order() {
        let table = PresetTable::default();
        let questions: Vec<&str> = table.questions().collect();
        assert_eq!(questions.len(), 6);
        assert_eq!(questions[0], "What is SkyPay?");
        assert_eq!(questions[5], "Is SkyPay a loaning company?");
    }
}
