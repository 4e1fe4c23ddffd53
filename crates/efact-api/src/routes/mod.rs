//! # Route Modules

pub mod documents;
pub mod signatures;
