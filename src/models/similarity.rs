use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Precomputed pairwise similarity scores between catalog rows
///
/// `rows[i][j]` is the similarity of rows `i` and `j`. Symmetry is assumed by
/// the producer but not enforced here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    /// Builds a matrix, rejecting ragged or non-square input
    pub fn new(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dim = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != dim) {
            return Err(AppError::Storage(format!(
                "Similarity matrix is not square: row {} has {} columns, expected {}",
                i,
                row.len(),
                dim
            )));
        }
        Ok(Self { rows })
    }

    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> AppResult<&[f32]> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(AppError::Index(index, self.rows.len()))
    }

    /// Checks that the matrix lines up with a catalog of `len` entries
    pub fn ensure_dim(&self, len: usize) -> AppResult<()> {
        if self.dim() != len {
            return Err(AppError::Storage(format!(
                "Similarity matrix has {} rows but the catalog has {} entries",
                self.dim(),
                len
            )));
        }
        Ok(())
    }

    /// Deserialized artifacts skip `new`, so re-check the shape after loading
    pub(crate) fn validated(self) -> AppResult<Self> {
        Self::new(self.rows)
    }
}
