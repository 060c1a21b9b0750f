use chrono::Utc;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    models::{Movie, MovieId, Recommendation, RecommendationSet},
    services::coordinator::FetchCoordinator,
};

/// Recommends the movies most similar to a selected title
///
/// Ranking comes straight from the precomputed similarity matrix; the ranked
/// movies are then enriched with posters and trailers through the
/// [`FetchCoordinator`]. The catalog is passed per call so a reload never
/// changes the data under an in-flight request.
#[derive(Clone)]
pub struct RecommendationEngine {
    coordinator: FetchCoordinator,
}

impl RecommendationEngine {
    pub fn new(coordinator: FetchCoordinator) -> Self {
        Self { coordinator }
    }

    pub async fn recommend(
        &self,
        catalog: &Catalog,
        title: &str,
        k: usize,
    ) -> AppResult<RecommendationSet> {
        let source_index = catalog.find_index_by_title(title)?;
        let source = movie_at(catalog, source_index)?.clone();

        let neighbors = rank_neighbors(catalog, source_index, k)?
            .into_iter()
            .map(|(index, score)| Ok((movie_at(catalog, index)?.clone(), score)))
            .collect::<AppResult<Vec<(Movie, f64)>>>()?;

        let movie_ids: Vec<MovieId> = neighbors.iter().map(|(movie, _)| movie.id).collect();
        let enrichments = if movie_ids.is_empty() {
            Default::default()
        } else {
            self.coordinator.fetch_all(&movie_ids).await
        };

        let recommendations = neighbors
            .into_iter()
            .map(|(movie, score)| {
                let enrichment = enrichments
                    .get(&movie.id)
                    .cloned()
                    .unwrap_or_else(|| self.coordinator.placeholder());
                Recommendation {
                    movie,
                    score,
                    enrichment,
                }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            title = %title,
            source_id = source.id,
            requested = k,
            returned = recommendations.len(),
            "Recommendations generated"
        );

        Ok(RecommendationSet {
            source,
            recommendations,
            generated_at: Utc::now(),
        })
    }
}

/// Top `k` neighbors of `source_index` as `(index, score)`, most similar first
///
/// Scores are sorted descending with ties broken by ascending index. The
/// source itself is always excluded, so a catalog of `n` movies yields at
/// most `n - 1` neighbors.
pub fn rank_neighbors(
    catalog: &Catalog,
    source_index: usize,
    k: usize,
) -> AppResult<Vec<(usize, f64)>> {
    let row = catalog.similarity_row(source_index).ok_or_else(|| {
        AppError::Internal(format!("No similarity row for index {}", source_index))
    })?;

    let mut ranked: Vec<(usize, f64)> = row.filter(|(index, _)| *index != source_index).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);

    Ok(ranked)
}

fn movie_at(catalog: &Catalog, index: usize) -> AppResult<&Movie> {
    catalog
        .movie(index)
        .ok_or_else(|| AppError::Internal(format!("No movie at catalog index {}", index)))
}
