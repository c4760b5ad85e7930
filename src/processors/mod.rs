pub mod parallel_processor;

pub use parallel_processor::ParallelProcessor;
