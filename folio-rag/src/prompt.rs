/// Renders the question-answering prompt for one query.
///
/// The model is told to answer from the supplied excerpts, may fall back on
/// general knowledge when they are irrelevant, and should quote the matching
/// excerpt after its explanation when the context held the answer.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an expert on Shakespeare's works. Use the provided context from Shakespeare's texts to answer the question accurately and helpfully.

Context from Shakespeare's works:
{context}

Question: {question}

Answer based on the Shakespeare context provided. If the context doesn't contain relevant information, say so but still try to provide a helpful response based on your knowledge of Shakespeare.

If the context is found in the data, after the explanation write the main context that is found in the data.

Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_filled() {
        let prompt = render_prompt("Source: Hamlet\nContent: Alas, poor Yorick!...\n---", "Who is Yorick?");
        assert!(prompt.contains("Context from Shakespeare's works:\nSource: Hamlet\n"));
        assert!(prompt.contains("\n\nQuestion: Who is Yorick?\n\n"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_braces_in_inputs_are_kept_verbatim() {
        let prompt = render_prompt("{question}", "{context}?");
        assert!(prompt.contains("works:\n{question}\n"));
        assert!(prompt.contains("Question: {context}?"));
    }
}
