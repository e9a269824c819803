pub mod credential;
pub mod document;
pub mod session_state;
pub mod verification;
