//! Fixed reply phrases and the system instruction for generation.

/// Reply used when a question has nothing to do with SkyPay.
pub const OFF_TOPIC_REPLY: &str = "I'm sorry, but I can only answer inquiries regarding SkyPay services. I cannot assist with general knowledge questions.";

/// Reply used when the automated agent does not know the answer.
pub const UNSURE_REPLY: &str = "I'm not sure about that yet, but I can help escalate it.";

/// System instruction with the retrieved context and both fallback phrases embedded.
pub fn build_system_prompt(context: &str) -> String {
    format!(
        "You are a strict customer support agent for SkyPay. \
         Your ONLY purpose is to answer questions about Skypay services. \
         Context: {context}. \
         RULES:\n\
         1. Use the Context to answer naturally.\n\
         2. If unrelated, reply: '{OFF_TOPIC_REPLY}'\n\
         3. If unsure, reply: '{UNSURE_REPLY}'"
    )
}
