use regex::Regex;

use crate::element_finder::ElementFinder;
use crate::models::{ExtractionResult, Job};
use crate::plugins::traits::DocumentSelector;
use crate::plugins::trackers::{parse_price, parse_stock_number};
use crate::utils::error::Result;

/// Turns a fetched page into an [`ExtractionResult`] according to a job's
/// selectors and patterns.
pub struct PageExtractor<'a> {
    selector: &'a dyn DocumentSelector,
}

impl<'a> PageExtractor<'a> {
    pub fn new(selector: &'a dyn DocumentSelector) -> Self {
        Self { selector }
    }

    pub fn extract(&self, html: &str, job: &Job) -> Result<ExtractionResult> {
        let mut result = ExtractionResult::default();

        let selectors: Vec<String> = [&job.in_stock_selector, &job.price_selector]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        if selectors.is_empty() {
            return Ok(result);
        }

        let mut texts = self.selector.select_first_texts(html, &selectors)?.into_iter();
        let stock_text = job.in_stock_selector.as_ref().and_then(|_| texts.next().flatten());
        let price_text = job.price_selector.as_ref().and_then(|_| texts.next().flatten());

        if let Some(text) = stock_text {
            if let Some(pattern) = job.stock_number_regex.as_deref() {
                let regex = Regex::new(pattern)?;
                result.stock_number = parse_stock_number(&text, &regex)?;
            }
            result.stock_text = text;
        }

        if let Some(text) = price_text {
            let regex = Regex::new(job.price_pattern())?;
            result.price = parse_price(Some(&text), &regex);
        }

        tracing::debug!("Extracted from {}: {}", job.name(), result);
        Ok(result)
    }
}

/// Extracts with the default `scraper`-backed selector engine.
pub fn extract(html: &str, job: &Job) -> Result<ExtractionResult> {
    let finder = ElementFinder::new();
    PageExtractor::new(&finder).extract(html, job)
}
