// Rust guideline compliant 2026-10-16

//! Adapters and host-side helpers for the storefront demo binary.
//!
//! `in_memory_catalog` implements the `Catalog` port from the `domain` crate.
//! The remaining modules stand in for the UI layer: a scaled monotonic clock,
//! the detail-view timer, and the seeded shopper simulator.

pub mod clock;
pub mod in_memory_catalog;
pub mod simulator;
pub mod view_timer;
