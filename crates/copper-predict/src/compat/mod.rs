//! Loaders for model formats written by other libraries.

pub mod xgboost;
