//! Task adapters over model resources.
//!
//! - [`RegressionModel`]: 18-feature vector → [`SellingPrice`] (`exp` of the
//!   model output, rounded to 3 decimals)
//! - [`ClassificationModel`]: 19-feature vector → [`DealOutcome`]
//!
//! Both hold a [`ModelHandle`], which reads the resource named by a
//! [`ModelSource`] and rejects a model trained for the other task.

mod classification;
mod handle;
mod regression;
mod source;

pub use classification::{ClassificationModel, DealOutcome};
pub use handle::ModelHandle;
pub use regression::{RegressionModel, SellingPrice};
pub use source::{ModelFormat, ModelLoadError, ModelSource};
