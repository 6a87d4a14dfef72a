//! Core domain layer. No external I/O dependencies.
//!
//! Entities and input rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod validation;

pub use entities::{
    EventDetails, ExtractEventDetailsRequest, FETCH_FAILED_SENTINEL, HashtagRequest,
    HashtagSuggestions, MAX_CONTENT_CHARS, MAX_META_VALUE_CHARS, PageContent, Platform,
    RecapRequest, RecapResult, SocialPostRequest, SocialPostSet, Tone,
};
pub use errors::DomainError;
pub use validation::Validate;
