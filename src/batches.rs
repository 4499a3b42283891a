//! Lazy, pull-based batch iteration over a paginated source.
//!
//! [`Batches`] is the one nontrivial contract in this crate: it walks a
//! source's zero-based pages one at a time, performing exactly one upstream
//! call per pull, and stops on the first empty page or once the row budget
//! is covered. Nothing is prefetched: page N+1 is not requested until the
//! consumer asks for it.

use anyhow::Result;

use crate::models::Batch;
use crate::traits::DataSource;

/// Number of articles the upstream API returns per page.
///
/// Assumed, not verified: the budget check counts whole pages at this size,
/// so the row budget is an approximate cap rounded up to a full page.
pub const UPSTREAM_PAGE_SIZE: usize = 10;

/// A pull-based iterator of per-page batches.
///
/// Created by [`Batches::new`] or [`DataSource::batches`]. Each call to
/// [`next`](Batches::next) fetches the next page and applies the
/// termination rules in order:
///
/// 1. An empty page ends the sequence without yielding.
/// 2. Otherwise the batch is yielded; if `(page + 1) * 10 >= row_budget`,
///    the sequence ends after this batch.
///
/// Consuming the iterator advances only its own page counter; the source
/// itself is untouched, and a fresh iterator starts again at page 0. An
/// error from the source terminates the sequence at that point; later pulls
/// return `Ok(None)`.
pub struct Batches<'a> {
    source: &'a dyn DataSource,
    row_budget: usize,
    page: usize,
    done: bool,
}

impl<'a> Batches<'a> {
    /// Create an iterator over `source`'s pages, capped at `row_budget`
    /// rows in whole-page increments.
    pub fn new(source: &'a dyn DataSource, row_budget: usize) -> Self {
        Self {
            source,
            row_budget,
            page: 0,
            done: false,
        }
    }

    /// Fetch and return the next batch, or `None` once the sequence has
    /// ended. Blocks the caller for the duration of the upstream call.
    pub async fn next(&mut self) -> Result<Option<Batch>> {
        if self.done {
            return Ok(None);
        }

        let batch = match self.source.fetch_page(self.page).await {
            Ok(batch) => batch,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        if batch.is_empty() {
            self.done = true;
            return Ok(None);
        }

        self.page += 1;
        if self.page * UPSTREAM_PAGE_SIZE >= self.row_budget {
            self.done = true;
        }

        Ok(Some(batch))
    }
}
