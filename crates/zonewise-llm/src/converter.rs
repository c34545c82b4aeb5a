use serde::Deserialize;
use serde_json::{json, Value};

use zonewise_core::context::LlmContext;
use zonewise_core::errors::GatewayError;
use zonewise_core::provider::{Completion, CompletionOptions, StopReason, TokenUsage};
use zonewise_core::turns::{ConversationTurn, Role};

/// Convert an LlmContext into an Anthropic Messages API request body.
pub fn build_request_body(context: &LlmContext, options: &CompletionOptions, model: &str) -> Value {
    let mut body = json!({
        "model": model,
        "max_tokens": options.max_tokens,
    });

    if let Some(temp) = options.temperature {
        body["temperature"] = json!(temp);
    }

    if !options.stop_sequences.is_empty() {
        body["stop_sequences"] = json!(options.stop_sequences);
    }

    if !context.system_prompt.is_empty() {
        body["system"] = json!(context.system_prompt);
    }

    body["messages"] = json!(convert_turns(&context.turns));

    body
}

/// Anthropic requires the history to open with a user turn and alternate roles.
/// Leading assistant turns are dropped; consecutive same-role turns are merged.
fn convert_turns(turns: &[ConversationTurn]) -> Vec<Value> {
    let mut merged: Vec<(Role, String)> = Vec::new();

    for turn in turns.iter().skip_while(|t| t.role == Role::Assistant) {
        match merged.last_mut() {
            Some((role, text)) if *role == turn.role => {
                text.push_str("\n\n");
                text.push_str(&turn.content);
            }
            _ => merged.push((turn.role, turn.content.clone())),
        }
    }

    merged
        .into_iter()
        .map(|(role, text)| json!({"role": role.as_str(), "content": text}))
        .collect()
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<UsageBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct UsageBlock {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

/// Parse a non-streaming Messages API response. Text blocks are concatenated;
/// other block types are ignored.
pub fn parse_response(raw: &str) -> Result<Completion, GatewayError> {
    let resp: MessagesResponse = serde_json::from_str(raw)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let text = resp
        .content
        .iter()
        .filter(|b| b.block_type == "text")
        .filter_map(|b| b.text.as_deref())
        .collect::<Vec<_>>()
        .join("");

    let stop_reason = resp.stop_reason.map(|s| match s.as_str() {
        "end_turn" => StopReason::EndTurn,
        "max_tokens" => StopReason::MaxTokens,
        "stop_sequence" => StopReason::StopSequence,
        _ => StopReason::Other(s),
    });

    Ok(Completion {
        text,
        stop_reason,
        usage: resp.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewise_core::turns::Conversation;

    fn context(turns: Vec<ConversationTurn>) -> LlmContext {
        LlmContext::new("You are ZoneWise.", &Conversation::new(turns))
    }

    #[test]
    fn request_body_basics() {
        let ctx = context(vec![ConversationTurn::user("R-1 setbacks?")]);
        let body = build_request_body(&ctx, &CompletionOptions::default(), "claude-sonnet-4-20250514");
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["system"], "You are ZoneWise.");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "R-1 setbacks?");
        assert!(body.get("temperature").is_none());
        assert!(body.get("stop_sequences").is_none());
    }

    #[test]
    fn optional_fields_included_when_set() {
        let opts = CompletionOptions {
            max_tokens: 512,
            temperature: Some(0.2),
            stop_sequences: vec!["END".into()],
        };
        let body = build_request_body(&context(vec![ConversationTurn::user("hi")]), &opts, "m");
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["stop_sequences"][0], "END");
    }

    #[test]
    fn empty_system_prompt_omitted() {
        let ctx = LlmContext::empty();
        let body = build_request_body(&ctx, &CompletionOptions::default(), "m");
        assert!(body.get("system").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn leading_assistant_dropped_and_same_roles_merged() {
        let ctx = context(vec![
            ConversationTurn::assistant("Welcome to ZoneWise!"),
            ConversationTurn::user("Palm Bay"),
            ConversationTurn::user("RS-2 height?"),
            ConversationTurn::assistant("35 feet."),
            ConversationTurn::user("Thanks"),
        ]);
        let body = build_request_body(&ctx, &CompletionOptions::default(), "m");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["content"], "Palm Bay\n\nRS-2 height?");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "Thanks");
    }

    #[test]
    fn parse_concatenates_text_blocks() {
        let raw = r#"{
            "content": [
                {"type": "text", "text": "R-1 front setback is 25 ft. "},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": "[ARTIFACT:MAP:R-1 in Melbourne]"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 120, "output_tokens": 40}
        }"#;
        let completion = parse_response(raw).unwrap();
        assert_eq!(completion.text, "R-1 front setback is 25 ft. [ARTIFACT:MAP:R-1 in Melbourne]");
        assert_eq!(completion.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(completion.usage.unwrap().output_tokens, 40);
    }

    #[test]
    fn parse_without_text_yields_empty() {
        let raw = r#"{"content": [], "stop_reason": "max_tokens"}"#;
        let completion = parse_response(raw).unwrap();
        assert_eq!(completion.text, "");
        assert_eq!(completion.stop_reason, Some(StopReason::MaxTokens));
        assert!(completion.usage.is_none());
    }

    #[test]
    fn parse_garbage_is_malformed() {
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
