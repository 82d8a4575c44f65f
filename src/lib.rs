//! # Bass Diffusion Workspace
//!
//! Single entry point to the workspace crates: the numerical core in
//! [`math`] and the estimation pipeline in [`diffusion`].
//!
//! ## Example
//!
//! ```
//! use bass_diffusion_workspace::diffusion::{BassEstimator, SalesData};
//!
//! let data = SalesData::from_sales(vec![100.0, 200.0, 400.0, 300.0, 150.0]).unwrap();
//! let estimator = BassEstimator::new();
//! let regression = estimator.fit(&data).unwrap();
//! let params = estimator.predict(&regression).unwrap();
//! assert!(params.m > data.total_sales());
//! ```

pub use bass_diffusion as diffusion;
pub use bass_math as math;
