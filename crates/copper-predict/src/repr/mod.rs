//! In-memory model representations.
//!
//! - [`gbdt`]: additive forests of numeric-split decision trees
//! - [`gblinear`]: a single-output linear booster

pub mod gbdt;
pub mod gblinear;
