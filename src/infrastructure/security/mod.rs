//! Security policy infrastructure

mod argon2_policy;

pub use argon2_policy::{Argon2SecurityPolicy, HashingConfig};
