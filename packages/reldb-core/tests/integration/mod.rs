//! Integration test suite for the relational engine.
//!
//! Covers:
//! - end-to-end statement scenarios through the text API
//! - join and index/scan equivalence properties
//! - persistence round-trips through real files

mod end_to_end_tests;
mod persistence_tests;
