//! Prompt builder: fixed instruction + context block + the user's message.

use ai_llm_service::ChatMessage;

/// Restricts the model to the retrieved context.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer only using the context below.";

/// Builds the three-message prompt sent to the completion model.
///
/// 1. [`SYSTEM_INSTRUCTION`]
/// 2. `"Context:\n"` followed by `context` joined with newlines, in the given
///    order (an empty context still produces this message)
/// 3. `user_message`, verbatim
///
/// # Example
/// ```
/// use contextor::prompt::build_messages;
///
/// let msgs = build_messages("Who founded it?", &["Founded in 1901.".to_string()]);
/// assert_eq!(msgs[1].content, "Context:\nFounded in 1901.");
/// assert_eq!(msgs[2].content, "Who founded it?");
/// ```
pub fn build_messages(user_message: &str, context: &[String]) -> [ChatMessage; 3] {
    [
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::system(format!("Context:\n{}", context.join("\n"))),
        ChatMessage::user(user_message),
    ]
}
