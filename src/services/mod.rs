//! Mood-to-recommendation pipeline and the state managers around it

pub mod cart;
pub mod client;
pub mod credentials;
pub mod parser;
pub mod prompts;
pub mod recommendations;
pub mod session;

pub use cart::CartManager;
pub use client::{AnthropicClient, RecommendationClient};
pub use credentials::CredentialStore;
pub use recommendations::get_recommendations;
pub use session::SessionManager;
