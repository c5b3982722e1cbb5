mod blocking;
mod http;
pub mod mock;
mod tokenizer;
mod traits;

pub use blocking::BlockingClient;
pub use http::OpenAiClient;
pub use tokenizer::TiktokenCounter;
pub use traits::CompletionClient;
