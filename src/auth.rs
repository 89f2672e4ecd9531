//! Auth-domain identifiers, roles, user profiles, and credential secrets.

pub mod id;
pub mod profile;
pub mod role;
pub mod secret;

pub use id::*;
pub use profile::*;
pub use role::*;
pub use secret::*;
