//! Core data types shared by the analysis passes and the file layer.

pub mod entities;
pub mod errors;
