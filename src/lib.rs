//! Italian capital gains and investment income tax engine.
//!
//! Given holdings, their transactions and cash flows, computes FIFO-matched
//! capital gains, dividend and interest income, and the tax owed for one
//! calendar year.

pub mod core;

pub use crate::core::*;
