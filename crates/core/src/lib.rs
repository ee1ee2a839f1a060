//! PerfumeShop Core - Shared types and storefront policies.
//!
//! This crate provides the types used by the storefront server and its
//! integration tests:
//! - [`types`] - Newtype wrappers for IDs, emails, phone numbers, prices, ratings, and statuses
//! - [`listing`] - Translation of catalog filter selections into a single backend query
//! - [`validation`] - Client-side form checks run before anything is sent to the backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no HTTP
//! clients. The backend owns every invariant that matters; the checks here
//! exist so obviously bad input never leaves the storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod types;
pub mod validation;

pub use listing::{FilterCriteria, ListingFilters, ListingParams, ListingQuery};
pub use types::*;
pub use validation::FormError;
