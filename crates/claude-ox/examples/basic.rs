use claude_ox::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Claude::load_from_env()?;

    let request = ChatRequest::builder()
        .model(Model::Claude35HaikuLatest)
        .messages(vec![Message::from("Why is the sky blue?")])
        .build();

    let response = client.send(&request).await?;

    for text in response.text_content() {
        println!("{text}");
    }
    println!(
        "\n[{} input tokens, {} output tokens]",
        response.usage.input_tokens.unwrap_or(0),
        response.usage.output_tokens.unwrap_or(0)
    );

    Ok(())
}
