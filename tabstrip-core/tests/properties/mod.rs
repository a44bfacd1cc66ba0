//! Property test modules

mod collection_tests;
mod config_tests;
mod model_invariant_tests;
mod move_engine_tests;
mod scenario_tests;
mod selection_tests;
mod tracing_tests;
