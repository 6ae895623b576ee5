//! Personal Income Tax Breakdown Engine
//!
//! This crate computes employer levies, employee taxes and contributions, and
//! net income for salaried workers under two kinds of rate table: a flat
//! income tax with an income-dependent exemption, and a marginal bracket tax.
//! Every calculation is pure and synchronous; amounts are exact decimals and
//! are never rounded.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
