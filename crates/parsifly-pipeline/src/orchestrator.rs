use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parsifly_analysis::{ClassificationOracle, Classifier};
use parsifly_core::{normalize_profile_handle, AppConfig, Platform, Post, PostAnalysis};
use parsifly_scraper::{adapt_all, ScrapeSource};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::BatchError;
use crate::phase::BatchPhase;

pub const MISSING_PROFILE: &str = "Platform and profile are required";

/// Added to the analysis budget so a post that uses its whole per-call
/// timeout still finishes inside the phase.
const ANALYSIS_GRACE: Duration = Duration::from_secs(2);

/// Timeouts and fan-out width for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub scrape_timeout: Duration,
    /// Multiplied by the post count to bound the whole analysis phase.
    pub analyze_timeout_per_post: Duration,
    pub max_concurrent: usize,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scrape_timeout: Duration::from_secs(config.scrape_timeout_secs),
            analyze_timeout_per_post: Duration::from_secs(config.analyze_timeout_per_post_secs),
            max_concurrent: config.classify_max_concurrent,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            scrape_timeout: Duration::from_secs(600),
            analyze_timeout_per_post: Duration::from_secs(30),
            max_concurrent: 4,
        }
    }
}

/// Output of a successful batch. Posts are in scrape order and all carry
/// analysis fields.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub platform: Platform,
    pub profile: String,
    pub posts: Vec<Post>,
}

/// Runs scrape → classify → aggregate for one profile at a time.
///
/// Holds no per-batch state, so one orchestrator can serve concurrent batches.
pub struct BatchOrchestrator<S, O> {
    source: Arc<S>,
    classifier: Arc<Classifier<O>>,
    settings: PipelineSettings,
}

impl<S, O> BatchOrchestrator<S, O>
where
    S: ScrapeSource + 'static,
    O: ClassificationOracle + 'static,
{
    /// The classifier's per-call timeout is capped at
    /// `settings.analyze_timeout_per_post`, so a slow oracle call is
    /// reported on its own post instead of exhausting the phase budget.
    #[must_use]
    pub fn new(source: S, classifier: Classifier<O>, settings: PipelineSettings) -> Self {
        let classifier = classifier.with_call_timeout_at_most(settings.analyze_timeout_per_post);
        Self {
            source: Arc::new(source),
            classifier: Arc::new(classifier),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs one full batch.
    ///
    /// `profile` may be a bare handle, `@handle`, or a profile URL.
    ///
    /// # Errors
    ///
    /// - [`BatchError::InvalidInput`]: blank profile.
    /// - [`BatchError::Scrape`], [`BatchError::ScrapeTimeout`],
    ///   [`BatchError::NoPostsFound`]: the scrape phase failed.
    /// - [`BatchError::AnalysisTimeout`]: classification exceeded its budget.
    /// - [`BatchError::NoPostsAnalyzed`]: nothing to aggregate.
    /// - [`BatchError::Cancelled`]: `cancel` fired; partial results are dropped.
    pub async fn run_batch(
        &self,
        platform: Platform,
        profile: &str,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, BatchError> {
        let outcome = self.run_phases(platform, profile, cancel).await;
        match &outcome {
            Ok(result) => tracing::info!(
                %platform,
                profile = %result.profile,
                posts = result.posts.len(),
                phase = %BatchPhase::Done,
                "batch complete"
            ),
            Err(err) => tracing::warn!(
                %platform,
                profile,
                failed_in = %err.failed_in(),
                phase = %BatchPhase::Failed,
                error = %err,
                "batch failed"
            ),
        }
        outcome
    }

    async fn run_phases(
        &self,
        platform: Platform,
        profile: &str,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, BatchError> {
        let profile = normalize_profile_handle(profile);
        if profile.is_empty() {
            return Err(BatchError::InvalidInput(MISSING_PROFILE.to_string()));
        }

        tracing::info!(%platform, %profile, phase = %BatchPhase::Scraping, "batch phase");
        let posts = self.scrape_posts(platform, &profile, cancel).await?;

        tracing::info!(
            %platform,
            %profile,
            posts = posts.len(),
            phase = %BatchPhase::Analyzing,
            "batch phase"
        );
        let analyzed = self.analyze_posts(posts, cancel).await?;

        tracing::info!(%platform, %profile, phase = %BatchPhase::Aggregating, "batch phase");
        if analyzed.is_empty() {
            return Err(BatchError::NoPostsAnalyzed);
        }

        Ok(BatchResult {
            platform,
            profile,
            posts: analyzed,
        })
    }

    /// Scrapes `profile` and adapts the raw items into posts.
    ///
    /// # Errors
    ///
    /// [`BatchError::Scrape`], [`BatchError::ScrapeTimeout`],
    /// [`BatchError::NoPostsFound`] or [`BatchError::Cancelled`].
    pub async fn scrape_posts(
        &self,
        platform: Platform,
        profile: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Post>, BatchError> {
        let limit = self.settings.scrape_timeout;
        let fetch = tokio::time::timeout(limit, self.source.fetch(platform, profile));

        let items = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(BatchError::Cancelled { phase: BatchPhase::Scraping });
            }
            outcome = fetch => match outcome {
                Ok(items) => items?,
                Err(_) => return Err(BatchError::ScrapeTimeout { after: limit }),
            },
        };

        let posts = adapt_all(platform, &items);
        if posts.is_empty() {
            return Err(BatchError::NoPostsFound);
        }
        Ok(posts)
    }

    /// Classifies every post with bounded concurrency. The output has the
    /// same length and order as `posts`, and every post carries analysis
    /// fields.
    ///
    /// The phase is bounded by `analyze_timeout_per_post × posts.len()` plus a
    /// short grace period.
    ///
    /// # Errors
    ///
    /// [`BatchError::AnalysisTimeout`] or [`BatchError::Cancelled`]. Per-post
    /// failures are never errors.
    pub async fn analyze_posts(
        &self,
        posts: Vec<Post>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Post>, BatchError> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let budget = self
            .settings
            .analyze_timeout_per_post
            .saturating_mul(u32::try_from(posts.len()).unwrap_or(u32::MAX))
            .saturating_add(ANALYSIS_GRACE);
        let width = self.settings.max_concurrent.max(1);

        let originals = posts.clone();
        let mut slots: Vec<Option<Post>> = vec![None; posts.len()];
        let mut pending = posts.into_iter().enumerate();
        // Dropping the set aborts any task still running.
        let mut tasks: JoinSet<(usize, Result<Post, String>)> = JoinSet::new();

        let drive = async {
            loop {
                while tasks.len() < width {
                    let Some((index, post)) = pending.next() else {
                        break;
                    };
                    let classifier = Arc::clone(&self.classifier);
                    tasks.spawn(async move {
                        let outcome = AssertUnwindSafe(classifier.analyze(post))
                            .catch_unwind()
                            .await
                            .map_err(panic_detail);
                        (index, outcome)
                    });
                }

                let Some(joined) = tasks.join_next().await else {
                    break;
                };
                match joined {
                    Ok((index, Ok(post))) => slots[index] = Some(post),
                    Ok((index, Err(detail))) => {
                        tracing::warn!(
                            post_url = %originals[index].post_url,
                            detail = %detail,
                            "post processing panicked"
                        );
                        slots[index] = Some(
                            originals[index]
                                .clone()
                                .with_analysis(PostAnalysis::processing_error(detail)),
                        );
                    }
                    Err(join_err) => {
                        tracing::warn!(error = %join_err, "classification task did not complete");
                    }
                }
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(BatchError::Cancelled { phase: BatchPhase::Analyzing });
            }
            outcome = tokio::time::timeout(budget, drive) => {
                if outcome.is_err() {
                    return Err(BatchError::AnalysisTimeout { after: budget });
                }
            }
        }

        Ok(slots
            .into_iter()
            .zip(originals)
            .map(|(slot, original)| {
                slot.unwrap_or_else(|| {
                    original.with_analysis(PostAnalysis::processing_error("task aborted"))
                })
            })
            .collect())
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
