//! Core data models for the income tax engine.
//!
//! This module contains the value types passed into and returned from the
//! calculation layer.

mod audit;
mod breakdown;
mod period;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use breakdown::{IncomeBreakdown, Levy, LevyKind};
pub use period::{PeriodMode, SalaryViewMode};
