//! Fotonom Core - Asynchronous photo analysis and naming orchestration.
//!
//! Fotonom takes uploaded photos and, for each one, classifies the scene via
//! external vision-AI providers and produces a deterministic, collision-free
//! file name.
//!
//! # Architecture
//!
//! ```text
//! Photo → TaskQueue slot → RateLimiter admission → VisionClient
//!       → SequenceCounter ordinal → "{location}_{scene}_{NNN}.{ext}"
//! ```
//!
//! The services are explicit instances constructed once at process start and
//! shared by reference; their internal check-then-mutate transitions are each
//! serialized so concurrent photos can never over-admit a slot, a quota, or
//! a sequence number.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fotonom_core::{Config, Pipeline, AnalysisRequest};
//!
//! let config = Config::load()?;
//! let pipeline = Pipeline::from_config(&config);
//! let record = pipeline
//!     .process_one(AnalysisRequest::new(bytes, "IMG_0042.jpg", None))
//!     .await;
//! println!("{}", record.final_name);
//! ```

// Module declarations
pub mod config;
pub mod counter;
pub mod error;
pub mod limiter;
pub mod naming;
pub mod pipeline;
pub mod queue;
pub mod types;
pub mod vision;

// Re-exports for convenient access
pub use config::Config;
pub use counter::{CounterStore, MemoryCounterStore, SequenceCounter};
pub use error::{ConfigError, ProviderError, StoreError};
pub use limiter::{LimiterStatus, RateLimiter};
pub use pipeline::Pipeline;
pub use queue::{QueueStatus, TaskQueue};
pub use types::{AnalysisRequest, AnalysisResult, PhotoRecord, ProgressEvent};
pub use vision::{VisionClient, VisionProvider};

use std::sync::Arc;
use std::time::Duration;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

impl Pipeline {
    /// Wire up a pipeline from configuration, with an in-process counter
    /// store. Deployments sharing a counter across instances construct the
    /// pipeline manually with their own [`CounterStore`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(TaskQueue::new(config.queue.max_parallel)),
            Arc::new(RateLimiter::new(
                config.limiter.max_requests,
                Duration::from_millis(config.limiter.window_ms),
            )),
            Arc::new(VisionClient::from_config(config)),
            Arc::new(SequenceCounter::new(Arc::new(MemoryCounterStore::new()))),
        )
    }
}
