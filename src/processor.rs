//! Transaction drivers. Both runners share the fold/callback step and differ only in how they
//! schedule executor calls.

mod backoff;
pub mod concurrent;
pub mod fold;
pub mod report;
pub mod sequential;
