//! Partition the full item list into fixed-size named datasets

use crate::domain::error::{AppError, Result};
use crate::domain::food_item::{Dataset, FoodItem};

pub struct DatasetBuilder {
    chunk_size: usize,
}

impl DatasetBuilder {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Split items into datasets of `chunk_size`, the last one possibly
    /// shorter. Names are stable across runs for the same input.
    pub fn build(&self, items: Vec<FoodItem>) -> Result<Vec<Dataset>> {
        if self.chunk_size == 0 {
            return Err(AppError::ValidationError(
                "Dataset chunk size must be > 0".to_string(),
            ));
        }

        let datasets = items
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(idx, chunk)| {
                Dataset::new(
                    format!("Dataset {} ({} items)", idx + 1, chunk.len()),
                    chunk.to_vec(),
                )
            })
            .collect();

        Ok(datasets)
    }
}
