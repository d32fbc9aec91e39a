//! Positional chunking of the record sequence into transactions.

pub mod chunker;
pub mod transaction;
