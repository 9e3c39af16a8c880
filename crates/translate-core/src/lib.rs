//! Batched, provider-failover translation of analysis content
//!
//! ```ignore
//! let pipeline = TranslationPipeline::from_config(&TranslationConfig::default());
//! let spanish = pipeline.translate(&summary_json, Language::Es, Language::En).await;
//! ```

pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod providers;

pub use config::{TranslationConfig, PASSTHROUGH_KEYS};
pub use error::TranslateError;
pub use language::Language;
pub use pipeline::TranslationPipeline;
pub use providers::{GeneralApiProvider, OpusMtProvider, TranslationProvider};
