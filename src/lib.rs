//! social-spark: event promotion and recap posts drafted by an LLM, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
