//! Testing utilities and mock implementations of the engine's seam traits.
//!
//! Mocks are controllable from tests: configure canned results, inject the
//! next error, and assert on recorded calls. Used by the resolver and
//! orchestrator test suites and available to downstream integration tests.

mod mocks;

pub use mocks::{
    MockDhtLookup, MockPreferenceStore, MockResolution, MockResolver, MockTrackerSearch,
};
