//! # Cellblock
//!
//! `cellblock` manages prisoner records stored in a hosted mock REST API and
//! gates the user administration behind a simple username/password login.
//!
//! ## Session
//!
//! 1. **Login:** the user collection is fetched and scanned for an exact
//!    username/password match. The API has no login endpoint and issues no
//!    token.
//! 2. **Marker:** on a match the auth flag flips to `true` and the marker
//!    `authenticated = "true"` is written to the state file.
//! 3. **Navigation:** every route change re-reads the marker and applies the
//!    route's `requires_auth` / `requires_guest` flags before anything is
//!    rendered.
//!
//! The marker is a convenience for the shell, not access control: anyone who
//! knows the API base URL can read and write both collections.
//!
//! ## Layout
//!
//! - [`features`]: auth state, storage and guard, plus the prisoner and user
//!   clients built on one generic resource client.
//! - [`routes`]: the route table and the guarded router.
//! - [`api`]: shared JSON-over-HTTP helpers.
//! - [`cli`]: the command-line shell.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod features;
pub mod routes;

pub use errors::AppError;
