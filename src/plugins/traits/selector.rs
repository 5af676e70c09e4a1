#[cfg(test)]
use mockall::automock;

use crate::utils::error::Result;

/// Finds the first element matching each of `selectors` in `document` and
/// returns its visible text, one entry per selector in the same order.
/// The document is parsed once per call. `None` means nothing matched; an
/// unusable selector is an error.
#[cfg_attr(test, automock)]
pub trait DocumentSelector: Send + Sync {
    fn select_first_texts(&self, document: &str, selectors: &[String]) -> Result<Vec<Option<String>>>;
}
