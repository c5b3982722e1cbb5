use fanout_core::{ChatMessage, ExpansionError, SubtaskDescriptor};
use fanout_service::CompletionClient;

/// Build the request for one point.
///
/// Sees only the question, the full skeleton and this point's descriptor.
pub fn expansion_request(
    point: &SubtaskDescriptor,
    prompt: &str,
    skeleton: &str,
) -> Vec<ChatMessage> {
    fanout_prompts::user_messages(&fanout_prompts::expansion_prompt(prompt, skeleton, point))
}

/// Expand a single point of the skeleton with one remote call.
pub async fn expand(
    client: &dyn CompletionClient,
    point: &SubtaskDescriptor,
    prompt: &str,
    skeleton: &str,
    model: &str,
) -> Result<String, ExpansionError> {
    let messages = expansion_request(point, prompt, skeleton);
    client
        .complete(&messages, model)
        .await
        .map_err(|source| ExpansionError {
            ordinal: point.ordinal,
            source,
        })
}

#[cfg(test)]
mod tests {
    use fanout_core::RemoteCallError;
    use fanout_service::mock::MockClient;

    use super::*;
    use crate::outline::parse_outline;

    #[test]
    fn request_is_single_user_message() {
        let points = parse_outline("1. Alpha\n2. Beta");
        let messages = expansion_request(&points[1], "Explain", "1. Alpha\n2. Beta");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, fanout_core::Role::User);
        assert!(messages[0].content.contains("point 2. Beta"));
        assert!(messages[0].content.contains("Explain"));
    }

    #[tokio::test]
    async fn expand_returns_text() {
        let client = MockClient::new().respond("point 1. Alpha", "A-text");
        let points = parse_outline("1. Alpha");
        let text = expand(&client, &points[0], "q", "1. Alpha", "m").await.unwrap();
        assert_eq!(text, "A-text");
        assert_eq!(client.calls()[0].model, "m");
    }

    #[tokio::test]
    async fn failure_is_tagged_with_ordinal() {
        let client = MockClient::new()
            .respond("point 1. Alpha", "A-text")
            .fail_on("point 2. Beta", RemoteCallError::Transport("reset".into()));
        let skeleton = "1. Alpha\n2. Beta";
        let points = parse_outline(skeleton);
        let err = expand(&client, &points[1], "q", skeleton, "m")
            .await
            .unwrap_err();
        assert_eq!(err.ordinal, 1);
        assert_eq!(err.source, RemoteCallError::Transport("reset".into()));
    }
}
