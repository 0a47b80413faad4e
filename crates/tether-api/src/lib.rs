//! Azure OpenAI chat-completions client for tether.

mod client;

pub use client::ApiClient;
