//! Pure REST clients for text generation
//!
//! Minimal clients for the OpenAI chat completions API and the Google Gemini
//! `generateContent` API, with no domain-specific logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{GeminiClient, GenerateContentRequest, OpenAIClient, ChatRequest, Message};
//!
//! let gemini = GeminiClient::from_env()?;
//! let text = gemini
//!     .generate_text("gemini-1.5-flash", &GenerateContentRequest::from_prompt("Hello!"))
//!     .await?;
//!
//! let openai = OpenAIClient::from_env()?;
//! let response = openai
//!     .chat_completion(ChatRequest::new("gpt-4o").message(Message::user("Hello!")))
//!     .await?;
//! ```

pub mod error;
pub mod gemini;
pub mod openai;
pub mod schema;
pub mod types;

pub use error::{LlmError, Result};
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use schema::StructuredOutput;
pub use types::*;
