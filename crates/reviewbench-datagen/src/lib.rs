//! reviewbench-datagen
//!
//! Synthetic product reviews. Opening lines come from rating-tiered
//! templates; names, emails and filler prose come from small Spanish
//! lexicons so output is reproducible from a seed.

pub mod generator;
pub mod lexicon;

pub use generator::{ReviewGenerator, Tier};
