//! Per-photo orchestration: queue slot → rate limit → analysis → sequence
//! number → final name.
//!
//! Batch progress is modeled as a channel of discrete events so the consumer
//! can back a streaming response, a progress bar, or a test assertion
//! equally. One item's failure never stops its siblings.

use crate::counter::SequenceCounter;
use crate::limiter::RateLimiter;
use crate::naming;
use crate::queue::TaskQueue;
use crate::types::{AnalysisRequest, PhotoRecord, ProgressEvent};
use crate::vision::VisionClient;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Buffer size for batch progress channels.
const PROGRESS_BUFFER: usize = 64;

/// The orchestration core: shared services wired together once at startup
/// and passed by reference into every call site.
pub struct Pipeline {
    queue: Arc<TaskQueue>,
    limiter: Arc<RateLimiter>,
    vision: Arc<VisionClient>,
    counter: Arc<SequenceCounter>,
}

impl Pipeline {
    pub fn new(
        queue: Arc<TaskQueue>,
        limiter: Arc<RateLimiter>,
        vision: Arc<VisionClient>,
        counter: Arc<SequenceCounter>,
    ) -> Self {
        Self {
            queue,
            limiter,
            vision,
            counter,
        }
    }

    /// Process a single photo end to end.
    ///
    /// Suspends until a queue slot is free, then until the rate limiter
    /// admits the provider call. Infallible by construction: analysis always
    /// yields a result and the counter degrades rather than failing.
    pub async fn process_one(&self, request: AnalysisRequest) -> PhotoRecord {
        let file_name = request.file_name.clone();
        self.queue
            .add(&file_name, async {
                self.limiter.check_limit().await;
                let analysis = self.vision.analyze(&request).await;
                let sequence = self.counter.next(&analysis.location).await;
                let extension = naming::extension_of(&request.file_name);
                let final_name = naming::build_name(
                    &analysis.location,
                    &analysis.scene,
                    sequence,
                    &extension,
                );
                PhotoRecord {
                    original_name: request.file_name,
                    location: analysis.location,
                    scene: analysis.scene,
                    sequence,
                    final_name,
                }
            })
            .await
    }

    /// Process a batch concurrently, streaming progress events.
    ///
    /// Concurrency is bounded by the task queue; events arrive in completion
    /// order, not submission order. The channel closes once every item has
    /// reported `Finished` or `Failed`.
    pub fn process_batch(
        self: &Arc<Self>,
        requests: Vec<AnalysisRequest>,
    ) -> mpsc::Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel(PROGRESS_BUFFER);

        for request in requests {
            let pipeline = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let file_name = request.file_name.clone();
                let _ = tx
                    .send(ProgressEvent::Started {
                        file_name: file_name.clone(),
                    })
                    .await;

                let pipeline_ref = pipeline.clone();
                let handle =
                    tokio::spawn(async move { pipeline_ref.process_one(request).await });

                let event = match handle.await {
                    Ok(record) => ProgressEvent::Finished(record),
                    // A panicked item reports failure; siblings keep running
                    Err(e) => ProgressEvent::Failed {
                        file_name: file_name.clone(),
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(event).await;
            });
        }

        rx
    }
}
