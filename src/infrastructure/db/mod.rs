pub mod results;

pub use results::ResultRepository;
