//! Tools the model may call during a generation. Implement ToolPort.

pub mod fetch_url;

pub use fetch_url::{FetchUrlContentTool, FETCH_URL_TOOL_NAME};
