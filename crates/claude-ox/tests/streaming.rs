use bytes::Bytes;
use claude_ox::{
    StreamError, StreamEvent,
    message::{Content, Role},
    response::StopReason,
    streaming::MessageStream,
};
use futures_util::{StreamExt, stream};
use serde_json::json;

fn stream_from_chunks(chunks: Vec<String>) -> MessageStream {
    MessageStream::new(stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok(Bytes::from(chunk)))
            .collect::<Vec<Result<Bytes, StreamError>>>(),
    ))
}

fn stream_from_lines(lines: &[&str]) -> MessageStream {
    stream_from_chunks(lines.iter().map(|line| format!("{line}\n")).collect())
}

#[tokio::test]
async fn assembles_text_message_end_to_end() {
    let mut stream = stream_from_lines(&[
        r#"data:{"type":"message_start","message":{"id":"m1","role":"assistant"}}"#,
        r#"data:{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
        r#"data:{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hel"}}"#,
        r#"data:{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"lo"}}"#,
        r#"data:{"type":"content_block_stop","index":0}"#,
        r#"data:{"type":"message_stop","stop_reason":"end_turn","usage":{"input_tokens":5,"output_tokens":2}}"#,
    ]);

    let mut events = 0;
    while stream.next().await.is_some() {
        events += 1;
    }

    assert_eq!(events, 6);
    assert!(stream.error().is_none());

    let message = stream.message();
    assert_eq!(message.id, "m1");
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.text_content(), vec!["Hello"]);
    assert_eq!(message.stop_reason, Some(StopReason::EndTurn));
    assert_eq!(message.usage.input_tokens, Some(5));
    assert_eq!(message.usage.output_tokens, Some(2));
}

#[tokio::test]
async fn assembles_tool_use_input_from_fragments() {
    let mut stream = stream_from_lines(&[
        r#"data: {"type":"message_start","message":{"id":"m2","role":"assistant"}}"#,
        r#"data: {"type":"content_block_start","index":0,"content_block":{"type":"tool_use","id":"toolu_1","name":"calculator","input":{}}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"{\"a\""}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":":1,\"b\":2"}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"}"}}"#,
        r#"data: {"type":"content_block_stop","index":0}"#,
        r#"data: {"type":"message_stop","stop_reason":"tool_use"}"#,
    ]);

    while stream.next().await.is_some() {}

    let message = stream.message();
    let tool_use = message.content[0].as_tool_use().expect("tool use block");
    assert_eq!(tool_use.id, "toolu_1");
    assert_eq!(tool_use.name, "calculator");
    assert_eq!(tool_use.input, json!({"a": 1, "b": 2}));
    assert_eq!(message.stop_reason, Some(StopReason::ToolUse));
}

#[tokio::test]
async fn tool_input_is_invariant_under_rechunking() {
    let payload = r#"{"city":"Oslo","unit":"celsius"}"#;
    let chunkings: Vec<Vec<&str>> = vec![
        vec![payload],
        vec![r#"{"city":"#, r#""Oslo","#, r#""unit":"celsius"}"#],
        payload
            .split_inclusive(|c: char| c == ',')
            .collect::<Vec<_>>(),
    ];

    let mut results = Vec::new();
    for fragments in chunkings {
        let mut lines = vec![
            r#"data: {"type":"message_start","message":{"id":"m3","role":"assistant"}}"#.to_string(),
            r#"data: {"type":"content_block_start","index":0,"content_block":{"type":"tool_use","id":"toolu_9","name":"get_weather","input":{}}}"#.to_string(),
        ];
        for fragment in fragments {
            let event = json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "input_json_delta", "partial_json": fragment},
            });
            lines.push(format!("data: {event}"));
        }
        lines.push(r#"data: {"type":"content_block_stop","index":0}"#.to_string());
        lines.push(r#"data: {"type":"message_stop"}"#.to_string());

        let mut stream =
            stream_from_chunks(lines.into_iter().map(|line| format!("{line}\n")).collect());
        while stream.next().await.is_some() {}
        results.push(
            stream.message().content[0]
                .as_tool_use()
                .expect("tool use block")
                .input
                .clone(),
        );
    }

    assert_eq!(results[0], json!({"city": "Oslo", "unit": "celsius"}));
    assert!(results.iter().all(|input| input == &results[0]));
}

#[tokio::test]
async fn sparse_block_start_fills_placeholders() {
    let mut stream = stream_from_lines(&[
        r#"data: {"type":"message_start","message":{"id":"m4","role":"assistant"}}"#,
        r#"data: {"type":"content_block_start","index":5,"content_block":{"type":"text","text":"tail"}}"#,
        r#"data: {"type":"message_stop"}"#,
    ]);

    while stream.next().await.is_some() {}

    let content = &stream.message().content;
    assert_eq!(content.len(), 6);
    assert!(content[..5]
        .iter()
        .all(|block| matches!(block, Content::Text(text) if text.is_empty())));
    assert_eq!(content[5], Content::text("tail"));
}

#[tokio::test]
async fn malformed_line_ends_iteration_and_keeps_prior_state() {
    let mut stream = stream_from_lines(&[
        r#"data:{"type":"message_start","message":{"id":"m5","role":"assistant"}}"#,
        r#"data:{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
        r#"data:{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"partial"}}"#,
        r#"data:{not json"#,
        r#"data:{"type":"message_stop","stop_reason":"end_turn"}"#,
    ]);

    let mut events = 0;
    while stream.next().await.is_some() {
        events += 1;
    }

    assert_eq!(events, 3);
    assert!(matches!(stream.error(), Some(StreamError::Decode(_))));

    // State folded before the error survives; the stop after it never landed.
    let message = stream.message();
    assert_eq!(message.id, "m5");
    assert_eq!(message.text_content(), vec!["partial"]);
    assert_eq!(message.stop_reason, None);

    // Iteration stays ended.
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn transport_error_surfaces_with_partial_message() {
    let chunks: Vec<Result<Bytes, StreamError>> = vec![
        Ok(Bytes::from(
            "data: {\"type\":\"message_start\",\"message\":{\"id\":\"m6\",\"role\":\"assistant\"}}\n\
             data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"text\",\"text\":\"so far\"}}\n",
        )),
        Err(StreamError::Transport("connection reset".to_string())),
    ];
    let mut stream = MessageStream::new(stream::iter(chunks));

    let mut events = 0;
    while stream.next().await.is_some() {
        events += 1;
    }

    assert_eq!(events, 2);
    assert!(matches!(stream.error(), Some(StreamError::Transport(_))));
    assert_eq!(stream.message().text_content(), vec!["so far"]);
}

#[tokio::test]
async fn final_message_drains_to_completion() {
    let stream = stream_from_lines(&[
        r#"data: {"type":"message_start","message":{"id":"m7","role":"assistant","model":"claude-3-5-haiku-latest"}}"#,
        r#"data: {"type":"ping"}"#,
        r#"data: {"type":"content_block_start","index":0,"content_block":{"type":"thinking","thinking":""}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"thinking_delta","thinking":"mull it over"}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"signature_delta","signature":"sig_first"}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"signature_delta","signature":"sig_final"}}"#,
        r#"data: {"type":"content_block_stop","index":0}"#,
        r#"data: {"type":"content_block_start","index":1,"content_block":{"type":"text","text":""}}"#,
        r#"data: {"type":"content_block_delta","index":1,"delta":{"type":"text_delta","text":"Answer"}}"#,
        r#"data: {"type":"content_block_stop","index":1}"#,
        r#"data: {"type":"message_stop","stop_reason":"end_turn","usage":{"input_tokens":11,"output_tokens":7}}"#,
    ]);

    let message = stream.final_message().await.expect("stream should finish");

    assert_eq!(message.model, "claude-3-5-haiku-latest");
    let thinking = message.content[0].as_thinking().expect("thinking block");
    assert_eq!(thinking.thinking, "mull it over");
    assert_eq!(thinking.signature, Some("sig_final".to_string()));
    assert_eq!(message.text_content(), vec!["Answer"]);
    assert_eq!(message.usage.total_tokens(), 18);
}

#[tokio::test]
async fn current_tracks_last_pulled_event() {
    let mut stream = stream_from_lines(&[
        r#"data: {"type":"message_start","message":{"id":"m8","role":"assistant"}}"#,
        r#"data: {"type":"message_stop"}"#,
    ]);

    assert!(stream.current().is_none());

    let first = stream.next().await.expect("first event");
    assert_eq!(stream.current(), Some(&first));
    assert!(matches!(first, StreamEvent::MessageStart { .. }));

    let second = stream.next().await.expect("second event");
    assert_eq!(stream.current(), Some(&second));
    assert!(matches!(second, StreamEvent::MessageStop { .. }));

    assert!(stream.next().await.is_none());
    // current keeps the last real event after exhaustion
    assert_eq!(stream.current(), Some(&second));
}

#[tokio::test]
async fn into_events_yields_the_same_sequence() {
    let stream = stream_from_lines(&[
        r#"data: {"type":"message_start","message":{"id":"m9","role":"assistant"}}"#,
        r#"data: {"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
        r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"hi"}}"#,
        r#"data: {"type":"content_block_stop","index":0}"#,
        r#"data: {"type":"message_stop"}"#,
    ]);

    let events: Vec<_> = stream
        .into_events()
        .collect::<Vec<Result<StreamEvent, StreamError>>>()
        .await;

    assert_eq!(events.len(), 5);
    assert!(events.iter().all(Result::is_ok));
    assert!(matches!(
        events.first(),
        Some(Ok(StreamEvent::MessageStart { .. }))
    ));
    assert!(matches!(
        events.last(),
        Some(Ok(StreamEvent::MessageStop { .. }))
    ));
}
