pub mod notifiers;
pub mod trackers;
pub mod traits;

pub use traits::{DocumentSelector, Fetcher, Notifier};
