/// Append the outline-only instructions.
pub fn append_instructions(prompt: &mut String) {
    prompt.push_str(
        "You're an organizer responsible for only giving the skeleton (not the full content) \
         for answering the question.\n\
         Provide the skeleton in a list of points (numbered 1., 2., 3., etc.) to answer the \
         question. Instead of writing a full sentence, each skeleton point should be very short \
         with only 3~5 words.\n",
    );
}

/// Append two worked question/skeleton pairs.
pub fn append_examples(prompt: &mut String) {
    prompt.push_str(
        "Question:\n\
         What are the typical types of Chinese dishes?\n\
         Skeleton:\n\
         1. Dumplings.\n\
         2. Noodles.\n\
         3. Dim Sum.\n\
         4. Hot Pot.\n\
         5. Wonton.\n\
         6. Ma Po Tofu.\n\
         7. Char Siu.\n\
         8. Fried Rice.\n\
         Question:\n\
         What are some practical tips for individuals to reduce their carbon emissions?\n\
         Skeleton:\n\
         1. Energy conservation.\n\
         2. Efficient transportation.\n\
         3. Home energy efficiency.\n\
         4. Reduce water consumption.\n\
         5. Sustainable diet.\n\
         6. Sustainable travel.\n",
    );
}

pub fn append_question(prompt: &mut String, question: &str) {
    prompt.push_str("Now, please provide the skeleton for the following question.\n");
    prompt.push_str(question);
    prompt.push('\n');
}
