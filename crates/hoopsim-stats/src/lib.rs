//! Statistics over simulated games and benchmark predictions.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`game_stats`]: Per-quarter measurements and batch summaries of simulated games
//! - [`metric`]: Discounted accuracy of numeric predictions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use hoopsim_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Scoring predictions
//!
//! ```
//! use hoopsim_stats::metric::discounted_accuracy;
//!
//! // exact, off by one, off by five
//! let accuracy = discounted_accuracy(&[10, 21, 35], &[10, 20, 30], 3).unwrap();
//! assert!((accuracy - (1.0 + 0.75) / 3.0).abs() < 1e-12);
//! ```

pub mod descriptive;
pub mod game_stats;
pub mod metric;
