//! Cross-module tests
//!
//! Scenario tests drive whole queries through a [`crate::world::PlaceWorld`];
//! property tests check index and query invariants over seeded random worlds.

mod properties;
