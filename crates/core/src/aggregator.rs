//! Paginated result aggregator
//!
//! A pure state machine that turns a [`Filter`] plus a series of "load more"
//! requests into one flat, ordered list of cars. It never performs I/O itself:
//! [`PageAggregator::start`] and [`PageAggregator::load_more`] hand out a
//! [`PageTicket`] describing the request to make, and the caller reports the
//! outcome back through [`PageAggregator::complete`].
//!
//! Guarantees:
//!
//! - Pages are appended strictly in page-number order, whatever order responses
//!   arrive in. Early arrivals wait in a buffer until the gap before them closes.
//! - Every [`PageAggregator::start`] opens a new session. Tickets from an older
//!   session are recognised by their epoch and their results are dropped.
//! - At most one request is in flight; `load_more` is a no-op until it settles.
//! - A failed request leaves accumulated items, the page cursor, and the
//!   "has more" answer exactly as they were. Retrying is up to the caller.

use std::collections::BTreeMap;

use log::debug;

use crate::catalog::{CarSummary, CarsResponse};
use crate::filter::{encode, Filter, RequestParams};
use crate::pagination::{decide, MoreDecision, PageMeta};

/// A request the aggregator wants the caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    epoch: u64,
    page: u32,
    params: RequestParams,
}

impl PageTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Listing parameters for this page, built by [`encode`].
    pub fn params(&self) -> &RequestParams {
        &self.params
    }
}

/// What happened to a reported page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// One or more pages joined the result list, in order.
    Appended { pages: Vec<u32>, items: usize },
    /// The page arrived ahead of an earlier one and is waiting.
    Buffered { page: u32 },
    /// The page belongs to a superseded session and was dropped.
    Stale { page: u32 },
    /// The page had already been appended in this session.
    Duplicate { page: u32 },
    /// The request failed; nothing changed except the error state.
    Failed { page: u32, message: String },
}

#[derive(Debug, Default)]
pub struct PageAggregator {
    filter: Filter,
    started: bool,
    epoch: u64,
    items: Vec<CarSummary>,
    last_appended: u32,
    last_meta: Option<PageMeta>,
    pending: BTreeMap<u32, CarsResponse>,
    in_flight: Option<u32>,
    error: Option<String>,
}

impl PageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session for `filter` and request its first page.
    ///
    /// Accumulated items, buffered pages, and any error from the previous session
    /// are discarded. Tickets already handed out become stale.
    pub fn start(&mut self, filter: Filter) -> PageTicket {
        self.epoch += 1;
        self.started = true;
        self.filter = filter;
        self.items.clear();
        self.last_appended = 0;
        self.last_meta = None;
        self.pending.clear();
        self.error = None;

        debug!("aggregator session {} started", self.epoch);
        self.issue(1)
    }

    /// Request the next page, unless one is already in flight or none is left.
    pub fn load_more(&mut self) -> Option<PageTicket> {
        if !self.started || self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        Some(self.issue(self.last_appended + 1))
    }

    fn issue(&mut self, page: u32) -> PageTicket {
        self.in_flight = Some(page);
        PageTicket {
            epoch: self.epoch,
            page,
            params: encode(&self.filter, Some(page)),
        }
    }

    /// Report the outcome of a ticket.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        outcome: Result<CarsResponse, String>,
    ) -> Completion {
        let page = ticket.page;

        if ticket.epoch != self.epoch {
            debug!(
                "dropping page {} from session {} (current session {})",
                page, ticket.epoch, self.epoch
            );
            return Completion::Stale { page };
        }

        if self.in_flight == Some(page) {
            self.in_flight = None;
        }

        let response = match outcome {
            Ok(response) => response,
            Err(message) => {
                self.error = Some(message.clone());
                return Completion::Failed { page, message };
            }
        };

        if page <= self.last_appended || self.pending.contains_key(&page) {
            return Completion::Duplicate { page };
        }

        self.pending.insert(page, response);

        let mut appended = Vec::new();
        let mut added = 0;
        while let Some(response) = self.pending.remove(&(self.last_appended + 1)) {
            self.last_appended += 1;
            self.last_meta = Some(PageMeta::from(&response));
            added += response.cars.len();
            self.items.extend(response.cars);
            appended.push(self.last_appended);
        }

        if appended.is_empty() {
            debug!(
                "buffering page {} until page {} arrives",
                page,
                self.last_appended + 1
            );
            return Completion::Buffered { page };
        }

        self.error = None;
        debug!(
            "appended pages {:?} ({} items, {} total)",
            appended,
            added,
            self.items.len()
        );
        Completion::Appended {
            pages: appended,
            items: added,
        }
    }

    /// Whether another page exists. True until the first page has been appended.
    pub fn has_more(&self) -> bool {
        if !self.started {
            return false;
        }
        self.decision().map(|d| d.has_more).unwrap_or(true)
    }

    /// The decision-table answer for the last appended page, if any.
    pub fn decision(&self) -> Option<MoreDecision> {
        self.last_meta
            .as_ref()
            .map(|meta| decide(meta, self.items.len()))
    }

    /// All appended items, in page order.
    pub fn items(&self) -> &[CarSummary] {
        &self.items
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Highest page appended so far (0 before the first page lands).
    pub fn last_page(&self) -> u32 {
        self.last_appended
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Message from the most recent failed request, until a page lands or it is dismissed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
