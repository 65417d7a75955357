//! Headless harness for driving weft render passes in tests.

mod testing;

pub use testing::{run_test_render, FiberTestRule};
pub use weft_core::StepDeadline;
