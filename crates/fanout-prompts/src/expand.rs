use fanout_core::SubtaskDescriptor;

/// Append the question and the whole outline so the point is written in context.
pub fn append_context(prompt: &mut String, question: &str, skeleton: &str) {
    prompt.push_str(
        "You're responsible for continuing the writing of one and only one point in the \
         overall answer to the following question.\n",
    );
    prompt.push_str(question);
    prompt.push('\n');
    prompt.push_str("The skeleton of the answer is\n");
    prompt.push_str(skeleton);
    prompt.push('\n');
}

/// Append the instruction naming the single point to expand.
pub fn append_instructions(prompt: &mut String, point: &SubtaskDescriptor) {
    prompt.push_str(&format!(
        "Continue and only continue the writing of point {}. \
         Expand on it and do not continue with other points!\n",
        point.raw_text
    ));
}
