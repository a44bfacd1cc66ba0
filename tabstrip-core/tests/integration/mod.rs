//! Integration test modules

mod embedder_tests;
mod observer_tests;
