// Adapters layer: concrete implementations for external systems (http, search, text generation, html).

pub mod html;
pub mod http;
pub mod ollama;
pub mod openai;
pub mod serpapi;

pub use http::HttpFetcher;
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use serpapi::SerpApiSearch;
