use scraper::{ElementRef, Html, Selector};

use crate::plugins::traits::DocumentSelector;
use crate::utils::error::{AppError, Result};
use crate::utils::text::collapse_whitespace;

/// CSS selector engine backed by the `scraper` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFinder;

impl ElementFinder {
    pub fn new() -> Self {
        ElementFinder
    }

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| AppError::Selector {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })
    }

    /// Visible text of an element: all descendant text nodes joined by a
    /// single space, whitespace collapsed and trimmed.
    pub fn visible_text(element: &ElementRef<'_>) -> String {
        collapse_whitespace(element.text())
    }

    pub fn first_text(document: &Html, selector: &str) -> Result<Option<String>> {
        let css_selector = Self::parse_selector(selector)?;
        Ok(document
            .select(&css_selector)
            .next()
            .map(|element| Self::visible_text(&element)))
    }

    /// Single-selector lookup on a raw document.
    pub fn select_first_text(&self, document: &str, selector: &str) -> Result<Option<String>> {
        Self::first_text(&Html::parse_document(document), selector)
    }
}

impl DocumentSelector for ElementFinder {
    fn select_first_texts(&self, document: &str, selectors: &[String]) -> Result<Vec<Option<String>>> {
        let document = Html::parse_document(document);
        selectors
            .iter()
            .map(|selector| Self::first_text(&document, selector))
            .collect()
    }
}
