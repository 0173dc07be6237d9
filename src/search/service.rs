use crate::db::ListingStore;
use crate::domain::filter::StructuredFilter;
use crate::domain::listing::RankedListing;
use crate::search::compiler::compile;
use crate::search::fusion::{execute_all, fuse};
use crate::search::interpreter::interpret;
use crate::search::llm::LanguageModel;
use crate::search::prompt::build_system_prompt;
use serde::Serialize;
use std::time::Instant;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search, like \"1 bedroom in Astoria under $3,000\".";
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "Sorry, we couldn't process your search right now. Please try again in a moment.";
pub const STORE_FAILURE_MESSAGE: &str =
    "Sorry, we couldn't load listings right now. Please try again in a moment.";

/// What the caller always gets back: listings (possibly none) and a
/// non-empty explanation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub listings: Vec<RankedListing>,
    pub interpretation: String,
    /// The filter the query was read as, when it got that far.
    pub filters: Option<StructuredFilter>,
}

impl SearchOutcome {
    fn empty(message: &str) -> Self {
        Self {
            listings: Vec::new(),
            interpretation: message.to_string(),
            filters: None,
        }
    }
}

/// The natural-language search pipeline: interpret, compile, execute, fuse.
pub struct SearchService {
    model: Box<dyn LanguageModel>,
    store: Box<dyn ListingStore>,
    system_prompt: String,
}

impl SearchService {
    pub fn new(model: Box<dyn LanguageModel>, store: Box<dyn ListingStore>) -> Self {
        Self {
            model,
            store,
            system_prompt: build_system_prompt(),
        }
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::empty(EMPTY_QUERY_MESSAGE);
        }

        let started = Instant::now();

        let filter = match interpret(self.model.as_ref(), &self.system_prompt, query) {
            Ok(filter) => filter,
            Err(e) => {
                tracing::error!(error = %e, %query, "language model call failed");
                return SearchOutcome::empty(UPSTREAM_FAILURE_MESSAGE);
            }
        };

        let descriptors = compile(&filter);
        let executed = execute_all(self.store.as_ref(), &descriptors);
        let every_table_failed = executed.iter().all(|q| q.rows.is_err());
        let listings = fuse(executed);

        let interpretation = if every_table_failed {
            STORE_FAILURE_MESSAGE.to_string()
        } else {
            filter.interpretation.clone()
        };

        tracing::info!(
            %query,
            tables = descriptors.len(),
            results = listings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search complete"
        );

        SearchOutcome {
            listings,
            interpretation,
            filters: Some(filter),
        }
    }
}
