//! Domain features (auth, prisoners, users) and the shared resource client.
//! The CLI actions import these modules so presentation stays separate from
//! storage, routing and API handling.

pub mod auth;
pub mod prisoners;
pub mod resource;
pub mod users;
