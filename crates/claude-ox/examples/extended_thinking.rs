use std::io::Write;

use claude_ox::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Claude::load_from_env()?;

    let request = ChatRequest::builder()
        .model(Model::Claude37SonnetLatest)
        .messages(vec![Message::from(
            "A bat and a ball cost $1.10 together. The bat costs $1.00 more \
             than the ball. How much does the ball cost?",
        )])
        .max_tokens(8192)
        .build()
        .with_thinking(4096);

    let mut stream = client.stream(&request).await?;

    while let Some(event) = stream.next().await {
        match event {
            StreamEvent::ContentBlockDelta {
                delta: ContentBlockDelta::ThinkingDelta { thinking },
                ..
            } => {
                eprint!("{thinking}");
                std::io::stderr().flush()?;
            }
            StreamEvent::ContentBlockDelta {
                delta: ContentBlockDelta::TextDelta { text },
                ..
            } => {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            _ => {}
        }
    }

    if let Some(error) = stream.error() {
        eprintln!("\nstream failed: {error}");
        return Ok(());
    }

    let message = stream.message();
    for block in message.thinking_blocks() {
        eprintln!(
            "\n[thinking block, {} chars, signed: {}]",
            block.thinking.len(),
            block.signature.is_some()
        );
    }

    Ok(())
}
