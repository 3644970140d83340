//! Basic client usage example

use llm_client::{ChatRequest, GeminiClient, GenerateContentRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(gemini) = GeminiClient::from_env() {
        println!("=== Gemini ===");
        let text = gemini
            .generate_text(
                "gemini-1.5-flash",
                &GenerateContentRequest::from_prompt("What is Rust in one sentence?")
                    .max_output_tokens(100),
            )
            .await?;
        println!("Response: {}", text);

        let models = gemini.list_models().await?;
        println!("Models available: {}", models.len());
    }

    if let Ok(openai) = OpenAIClient::from_env() {
        println!("\n=== OpenAI ===");
        let response = openai
            .chat_completion(
                ChatRequest::new("gpt-4o")
                    .message(Message::system("You are a helpful assistant."))
                    .message(Message::user("What is Rust in one sentence?"))
                    .temperature(0.7)
                    .max_tokens(100),
            )
            .await?;
        println!("Response: {}", response.content);
    }

    Ok(())
}
