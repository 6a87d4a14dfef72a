//! Infrastructure adapters. Implement outbound ports.
//!
//! Model APIs, page fetching, export, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod export;
pub mod tools;
pub mod ui;
pub mod web;

#[cfg(test)]
pub mod test_server;
