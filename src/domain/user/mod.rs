//! User domain
//!
//! Profile records owned 1:1 by an account: entity, validation and the
//! repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserProfile};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_profile, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;
