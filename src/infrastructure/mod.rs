//! Infrastructure layer - Store, credential and token implementations

pub mod account;
pub mod auth;
pub mod logging;
pub mod security;
pub mod storage;
pub mod user;
