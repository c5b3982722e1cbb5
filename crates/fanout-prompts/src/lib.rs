pub mod expand;
pub mod skeleton;

use fanout_core::{ChatMessage, SubtaskDescriptor};

/// Prompt asking the model for a short numbered outline of `question`.
pub fn skeleton_prompt(question: &str) -> String {
    let mut prompt = String::new();
    skeleton::append_instructions(&mut prompt);
    skeleton::append_examples(&mut prompt);
    skeleton::append_question(&mut prompt, question);
    prompt
}

/// Prompt asking the model to write out exactly one point of `skeleton`.
///
/// Takes only the original question, the full outline and the target point,
/// so no expansion can see another expansion's output.
pub fn expansion_prompt(question: &str, skeleton: &str, point: &SubtaskDescriptor) -> String {
    let mut prompt = String::new();
    expand::append_context(&mut prompt, question, skeleton);
    expand::append_instructions(&mut prompt, point);
    prompt
}

/// Wrap a prompt as a single user message.
pub fn user_messages(prompt: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(prompt)]
}
