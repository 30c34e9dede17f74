pub mod batch_prediction;
pub mod dataset_builder;
pub mod evaluation;
pub mod hashing;
pub mod label_extractor;
pub mod prompt_builder;
