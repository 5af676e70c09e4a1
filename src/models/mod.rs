pub mod extraction;
pub mod job;
pub mod report;

// Re-exports for convenience
pub use extraction::*;
pub use job::*;
pub use report::*;
