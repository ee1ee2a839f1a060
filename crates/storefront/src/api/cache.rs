//! Cache types for public catalog metadata.
//!
//! Only brand and category lists are cached. Perfume listings carry
//! per-shopper favorite flags and are always fetched fresh.

use crate::models::{Brand, Category};

/// Cache key for catalog metadata.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Brands,
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Brands(Vec<Brand>),
    Categories(Vec<Category>),
}
