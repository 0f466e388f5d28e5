use claude_ox::{message::Image, prelude::*};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Claude::load_from_env()?;

    let image = match std::env::args().nth(1) {
        Some(path) => Image::from_path(path)?,
        None => Image::from_url("https://upload.wikimedia.org/wikipedia/commons/a/a7/Camponotus_flavomarginatus_ant.jpg"),
    };

    let request = ChatRequest::builder()
        .model(Model::Claude35SonnetLatest)
        .messages(vec![Message::user(vec![
            Content::from(image),
            Content::text("Describe this image in one sentence."),
        ])])
        .build();

    let response = client.send(&request).await?;

    for text in response.text_content() {
        println!("{text}");
    }

    Ok(())
}
