//! File and console plumbing around the analysis passes.

pub mod report;
pub mod wav;
