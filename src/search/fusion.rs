// src/search/fusion.rs

use crate::db::ListingStore;
use crate::domain::catalog::ListingTable;
use crate::domain::listing::{ListingRecord, RankedListing};
use crate::errors::ServerError;
use crate::search::descriptor::QueryDescriptor;
use std::time::Instant;

/// Most listings a search ever returns.
pub const RESULT_CAP: usize = 20;

/// Outcome of running one table's descriptor.
#[derive(Debug)]
pub struct ExecutedQuery {
    pub table: ListingTable,
    pub rows: Result<Vec<ListingRecord>, ServerError>,
}

/// Runs every descriptor against the store. Two or more run on their own
/// scoped threads and are joined before returning; results keep the order
/// of `descriptors`.
pub fn execute_all(store: &dyn ListingStore, descriptors: &[QueryDescriptor]) -> Vec<ExecutedQuery> {
    match descriptors {
        [] => Vec::new(),
        [only] => vec![execute_one(store, only)],
        _ => std::thread::scope(|scope| {
            let handles: Vec<_> = descriptors
                .iter()
                .map(|descriptor| {
                    (
                        descriptor.table,
                        scope.spawn(move || execute_one(store, descriptor)),
                    )
                })
                .collect();

            handles
                .into_iter()
                .map(|(table, handle)| {
                    handle.join().unwrap_or_else(|_| ExecutedQuery {
                        table,
                        rows: Err(ServerError::InternalError),
                    })
                })
                .collect()
        }),
    }
}

fn execute_one(store: &dyn ListingStore, descriptor: &QueryDescriptor) -> ExecutedQuery {
    let started = Instant::now();
    let rows = store.fetch(descriptor);
    tracing::debug!(
        table = descriptor.table.name(),
        rows = rows.as_ref().map(Vec::len).unwrap_or(0),
        ok = rows.is_ok(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "table query finished"
    );
    ExecutedQuery {
        table: descriptor.table,
        rows,
    }
}

/// Tags, merges and ranks per-table results.
///
/// A failed table contributes nothing. Rows are ordered by discount (or
/// undervaluation) descending; equal keys keep their merged order. At most
/// [`RESULT_CAP`] rows come back.
pub fn fuse(executed: Vec<ExecutedQuery>) -> Vec<RankedListing> {
    let mut ranked: Vec<RankedListing> = Vec::new();

    for query in executed {
        match query.rows {
            Ok(rows) => ranked.extend(rows.into_iter().map(RankedListing::annotate)),
            Err(e) => {
                tracing::warn!(table = query.table.name(), error = %e, "table query failed, skipping");
            }
        }
    }

    // sort_by is stable
    ranked.sort_by(|a, b| b.rank_key().total_cmp(&a.rank_key()));
    ranked.truncate(RESULT_CAP);
    ranked
}
