//! SurfsUp: a read-only JSON API over the Hawaii climate dataset.
//!
//! The dataset is a SQLite file with a `measurement` table (daily
//! precipitation and temperature per station) and a `station` table. The
//! [`gateway`] serves trailing-year precipitation and observations, the
//! station list, and min/avg/max temperature summaries for a date range.

pub mod config;
pub mod gateway;
pub mod store;
pub mod window;
