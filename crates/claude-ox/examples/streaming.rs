use std::io::Write;

use claude_ox::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Claude::load_from_env()?;

    let request = ChatRequest::builder()
        .model(Model::Claude35HaikuLatest)
        .messages(vec![Message::from("Write a short poem about streams.")])
        .build();

    let mut stream = client.stream(&request).await?;

    while let Some(event) = stream.next().await {
        if let StreamEvent::ContentBlockDelta {
            delta: ContentBlockDelta::TextDelta { text },
            ..
        } = event
        {
            print!("{text}");
            std::io::stdout().flush()?;
        }
    }

    if let Some(error) = stream.error() {
        eprintln!("\nstream failed: {error}");
    } else {
        let message = stream.message();
        println!(
            "\n\n[stop reason: {:?}, {} tokens]",
            message.stop_reason,
            message.usage.total_tokens()
        );
    }

    Ok(())
}
