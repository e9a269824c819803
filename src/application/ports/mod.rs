//! Seams between the session orchestrator and the outside world.

pub mod auth_gateway;
pub mod token_store;
pub mod verification_gateway;

pub use auth_gateway::AuthGateway;
pub use token_store::TokenStore;
pub use verification_gateway::VerificationGateway;
