//! Core library for rentcat
//!
//! This crate implements the **Functional Core** of the rentcat application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`rentcat_core`** (this crate): pure transformations and state machines, no I/O
//! - **`rentcat`**: HTTP calls, durable storage, and the command line (the Imperative Shell)
//!
//! Everything here can be exercised with fixture data: no network, no filesystem,
//! no clock (callers pass "today" in where a date matters).
//!
//! # Module Organization
//!
//! - [`filter`]: URL query string <-> [`filter::Filter`] <-> listing request parameters
//! - [`format`]: thousands grouping and address shortening for display
//! - [`catalog`]: listing/detail API models and their card/detail views
//! - [`pagination`]: the priority-ordered "is there another page?" decision table
//! - [`aggregator`]: merges pages into one ordered list, with session and in-flight guards
//! - [`favorites`]: the favorites set and its stored form
//! - [`cursor`]: the page cursor and the stored catalog state (with schema migration)
//! - [`persist`]: the versioned envelope shared by everything kept in local storage
//! - [`booking`]: booking form validation
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use rentcat_core::aggregator::PageAggregator;
//! use rentcat_core::filter::decode_query_string;
//!
//! let filter = decode_query_string("brand=BMW&rentalPrice=$40");
//!
//! let mut aggregator = PageAggregator::new();
//! let ticket = aggregator.start(filter);
//!
//! // Perform the request described by `ticket.params()`, then report back:
//! aggregator.complete(ticket, Ok(response));
//!
//! if let Some(next) = aggregator.load_more() {
//!     // ...
//! }
//! ```

pub mod aggregator;
pub mod booking;
pub mod catalog;
pub mod cursor;
pub mod favorites;
pub mod filter;
pub mod format;
pub mod pagination;
pub mod persist;
