#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod hash_engine;

pub use hash_engine::*;
