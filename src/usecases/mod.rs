//! Application use cases. Orchestrate domain logic via ports.

pub mod actions;
pub mod extraction_service;
pub mod generator;
pub mod promotion_service;
pub mod recap_service;
pub mod template;

pub use actions::{ActionResult, Actions};
pub use extraction_service::EventExtractionService;
pub use generator::StructuredPrompt;
pub use promotion_service::PromotionService;
pub use recap_service::RecapService;
