use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::{
    models::{EnrichmentResult, MovieId},
    services::enrichment::EnrichmentClient,
};

/// Runs [`EnrichmentClient::fetch_one`] for a batch of movies with bounded parallelism
///
/// Each unique movie gets its own task; at most `max_in_flight` of them hold a
/// permit at once and the rest wait for a slot. A task that dies (panic or
/// cancellation) is replaced by the placeholder result, so every requested id
/// is present in the returned map.
#[derive(Clone)]
pub struct FetchCoordinator {
    client: EnrichmentClient,
    max_in_flight: usize,
}

impl FetchCoordinator {
    pub fn new(client: EnrichmentClient, max_in_flight: usize) -> Self {
        Self {
            client,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Result substituted for a movie whose task failed
    pub fn placeholder(&self) -> EnrichmentResult {
        self.client.placeholder()
    }

    /// Spawned tasks inherit this call's span, so their logs stay tied to the request
    #[tracing::instrument(skip_all, fields(movie_count = movie_ids.len()))]
    pub async fn fetch_all(&self, movie_ids: &[MovieId]) -> HashMap<MovieId, EnrichmentResult> {
        let mut seen = HashSet::with_capacity(movie_ids.len());
        let unique: Vec<MovieId> = movie_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        tracing::info!(
            movie_count = unique.len(),
            max_in_flight = self.max_in_flight,
            "Fetching enrichment batch"
        );

        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = Vec::with_capacity(unique.len());

        for movie_id in unique {
            let client = self.client.clone();
            let permits = permits.clone();
            let task = tokio::spawn(
                async move {
                    // never closed
                    let _permit = permits.acquire_owned().await.ok();
                    client.fetch_one(movie_id).await
                }
                .instrument(tracing::Span::current()),
            );
            tasks.push((movie_id, task));
        }

        let mut results = HashMap::with_capacity(tasks.len());
        let mut failures = 0;

        for (movie_id, task) in tasks {
            let enrichment = match task.await {
                Ok(enrichment) => enrichment,
                Err(e) => {
                    tracing::error!(movie_id = movie_id, error = %e, "Enrichment task failed");
                    failures += 1;
                    self.client.placeholder()
                }
            };
            results.insert(movie_id, enrichment);
        }

        if failures > 0 {
            tracing::warn!(
                success_count = results.len() - failures,
                error_count = failures,
                "Partial enrichment failure"
            );
        }

        results
    }
}
