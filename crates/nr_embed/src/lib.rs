pub mod dummy;
pub mod openai;
pub mod tokenizer;

pub use dummy::DummyEmbedder;
pub use openai::OpenAiEmbedder;
pub use tokenizer::{Tokenizer, Truncation};
