//! AI adapter module. Implements LlmPort for model integration.
//!
//! Provides OpenAI-compatible adapter and mock adapter for offline runs and tests.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::{MockLlmAdapter, MockReply, RecordedCall};
pub use openai_adapter::OpenAiAdapter;
