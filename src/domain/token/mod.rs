//! Session token domain

mod authority;
mod claims;

pub use authority::TokenAuthority;
pub use claims::{AccountClaims, CallerIdentity};
pub(crate) use claims::expiry_from;

#[cfg(test)]
pub use authority::MockTokenAuthority;
