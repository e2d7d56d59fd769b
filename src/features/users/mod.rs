pub mod client;
pub mod types;

pub use client::UserClient;
pub use types::User;
