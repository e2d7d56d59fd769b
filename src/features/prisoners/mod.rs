//! Prisoner records: an open JSON shape served from the `prisoners`
//! collection. The client is the generic resource client with no additions.

pub mod types;

pub use types::Prisoner;

pub type PrisonerClient = crate::features::resource::ResourceClient<Prisoner>;
