use claude_ox::prelude::*;
use serde_json::json;

fn run_calculator(input: &serde_json::Value) -> serde_json::Value {
    let a = input["a"].as_f64().unwrap_or(0.0);
    let b = input["b"].as_f64().unwrap_or(0.0);
    match input["operation"].as_str() {
        Some("add") => json!({"result": a + b}),
        Some("subtract") => json!({"result": a - b}),
        Some("multiply") => json!({"result": a * b}),
        Some("divide") if b != 0.0 => json!({"result": a / b}),
        _ => json!({"error": "unsupported operation"}),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Claude::load_from_env()?;

    let calculator = Tool::new("calculator", "Perform basic arithmetic").with_schema(
        InputSchema::object()
            .property(
                "operation",
                Property::enumerated(
                    "Arithmetic operation",
                    ["add", "subtract", "multiply", "divide"],
                ),
            )
            .property("a", Property::number("First operand"))
            .property("b", Property::number("Second operand"))
            .require("operation")
            .require("a")
            .require("b"),
    );

    let mut request = ChatRequest::builder()
        .model(Model::Claude35SonnetLatest)
        .messages(vec![Message::from("What is 37 times 54?")])
        .tools(vec![calculator])
        .tool_choice(ToolChoice::Auto)
        .build();

    let response = client.send(&request).await?;

    if response.has_tool_use() {
        let mut results = Vec::new();
        for tool_use in response.tool_uses() {
            println!("model called {} with {}", tool_use.name, tool_use.input);
            let output = run_calculator(&tool_use.input);
            results.push(Content::ToolResult(ToolResult::text(
                tool_use.id.clone(),
                output.to_string(),
            )));
        }

        request.push_message(Message::assistant(response.content.clone()));
        request.push_message(Message::user(results));

        let follow_up = client.send(&request).await?;
        for text in follow_up.text_content() {
            println!("{text}");
        }
    } else {
        for text in response.text_content() {
            println!("{text}");
        }
    }

    Ok(())
}
