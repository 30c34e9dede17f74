pub mod use_cases;

pub use use_cases::batch_prediction::{BatchPredictionUseCase, BatchReport};
pub use use_cases::dataset_builder::DatasetBuilder;
pub use use_cases::evaluation::BatchSummary;
