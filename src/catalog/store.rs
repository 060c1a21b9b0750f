use std::collections::HashMap;

use super::CatalogError;
use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// Movies plus their pairwise similarity matrix
///
/// Row `i` and column `i` of the matrix both refer to `movies[i]`. The
/// catalog is immutable once built; reloading produces a new instance.
#[derive(Debug)]
pub struct Catalog {
    movies: Vec<Movie>,
    /// Row-major, `movies.len()` x `movies.len()`
    similarity: Vec<f64>,
    /// Title -> first index carrying that title
    title_index: HashMap<String, usize>,
    duplicate_titles: usize,
}

impl Catalog {
    /// Builds a catalog, checking that the matrix is square and aligned with the movies
    pub fn new(movies: Vec<Movie>, similarity: Vec<Vec<f64>>) -> Result<Self, CatalogError> {
        let n = movies.len();
        if similarity.len() != n {
            return Err(CatalogError::RowCountMismatch {
                rows: similarity.len(),
                items: n,
            });
        }

        let mut flat = Vec::with_capacity(n * n);
        for (row, scores) in similarity.into_iter().enumerate() {
            if scores.len() != n {
                return Err(CatalogError::RowLengthMismatch {
                    row,
                    found: scores.len(),
                    expected: n,
                });
            }
            if let Some(column) = scores.iter().position(|s| !s.is_finite()) {
                return Err(CatalogError::NonFiniteScore { row, column });
            }
            flat.extend(scores);
        }

        let mut title_index = HashMap::with_capacity(n);
        let mut duplicate_titles = 0;
        for (index, movie) in movies.iter().enumerate() {
            if title_index.contains_key(&movie.title) {
                duplicate_titles += 1;
            } else {
                title_index.insert(movie.title.clone(), index);
            }
        }

        Ok(Self {
            movies,
            similarity: flat,
            title_index,
            duplicate_titles,
        })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Number of movies whose title was already taken by an earlier movie
    pub fn duplicate_titles(&self) -> usize {
        self.duplicate_titles
    }

    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Index of the first movie titled exactly `title`
    pub fn find_index_by_title(&self, title: &str) -> AppResult<usize> {
        self.title_index
            .get(title)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("No movie titled '{}' in catalog", title)))
    }

    /// Full similarity row for `index`, paired with each column's index
    pub fn similarity_row(&self, index: usize) -> Option<impl Iterator<Item = (usize, f64)> + '_> {
        let n = self.movies.len();
        if index >= n {
            return None;
        }
        let row = &self.similarity[index * n..(index + 1) * n];
        Some(row.iter().copied().enumerate())
    }
}
