pub mod fetcher;
pub mod notifier;
pub mod selector;

pub use fetcher::Fetcher;
pub use notifier::{Delivery, NotificationMessage, Notifier};
pub use selector::DocumentSelector;
