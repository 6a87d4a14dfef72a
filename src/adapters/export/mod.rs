//! Export adapters. Implement PostExportPort.

pub mod markdown;

pub use markdown::MarkdownExporter;
