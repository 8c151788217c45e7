//! Row sources for the preview: JSON fixtures and built-in samples.

pub mod fixture;

pub use fixture::{format_timestamp, parse_rows, FixtureImages, FixtureProvider};
