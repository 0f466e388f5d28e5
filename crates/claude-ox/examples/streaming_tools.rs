use std::io::Write;

use claude_ox::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Claude::load_from_env()?;

    let weather = Tool::new("get_weather", "Get the current weather for a city").with_schema(
        InputSchema::object()
            .property("city", Property::string("City name"))
            .property(
                "unit",
                Property::enumerated("Temperature unit", ["celsius", "fahrenheit"]),
            )
            .require("city"),
    );

    let request = ChatRequest::builder()
        .model(Model::Claude35SonnetLatest)
        .messages(vec![Message::from("What's the weather in Oslo right now?")])
        .tools(vec![weather])
        .build();

    let mut stream = client.stream(&request).await?;

    // Text streams out as it arrives; tool arguments assemble quietly in the
    // accumulated message.
    while let Some(event) = stream.next().await {
        match event {
            StreamEvent::ContentBlockDelta {
                delta: ContentBlockDelta::TextDelta { text },
                ..
            } => {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            StreamEvent::ContentBlockStart { index, .. } => {
                eprintln!("[block {index} started]");
            }
            _ => {}
        }
    }

    if let Some(error) = stream.error() {
        eprintln!("stream failed: {error}");
        return Ok(());
    }

    let message = stream.message();
    for tool_use in message.tool_uses() {
        println!(
            "\nassembled tool call: {} -> {}",
            tool_use.name, tool_use.input
        );
    }

    Ok(())
}
