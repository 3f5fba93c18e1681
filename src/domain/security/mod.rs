//! Security policy domain
//!
//! Password strength rules and the policy trait used for hashing and
//! comparing credentials.

mod policy;
mod rules;

pub use policy::SecurityPolicy;
pub use rules::{PasswordRule, PasswordRules};
