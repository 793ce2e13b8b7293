//! DebtLab Core: acquisition and transformation of U.S. national debt data.
//!
//! This crate covers the pipeline from query to typed series:
//! - Request builder for the Fiscal Data API (MSPD table 1)
//! - Blocking HTTP fetcher and a replaying fetcher for saved payloads
//! - JSON parser producing text-typed rows plus pagination metadata
//! - Normalizer producing typed `DebtRecord`s
//! - Views (total-only, holder split, marketability, security class)
//! - Derived series (annualized growth, rolling mean)

pub mod data;
pub mod dataset;
pub mod domain;
pub mod series;
pub mod views;

pub use dataset::DebtDataset;
