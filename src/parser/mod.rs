//! Text parsers shared by the job and company pipelines.
//!
//! `fields`, `salary`, `dates` and `keywords` work on loosely labelled text
//! (`Label: value`). `sections` works on `## Title ##` reports. `extract`
//! stitches them into records.

pub mod dates;
pub mod extract;
pub mod fields;
pub mod keywords;
pub mod salary;
pub mod sections;
