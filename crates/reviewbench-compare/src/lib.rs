//! reviewbench-compare
//!
//! Issues the same logical queries against two review stores, times each call
//! and renders the side-by-side report with the speed ratio.
#![deny(unused_imports)]

pub mod harness;
pub mod measure;
pub mod shape;

pub use harness::{ComparisonHarness, ParityReport};
pub use measure::{Measurement, Outcome, ShapeComparison};
pub use shape::{canned_shapes, QueryShape};
