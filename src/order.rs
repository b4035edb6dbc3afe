//! Explicit precedence values shared by exception resolvers and
//! error message sources.
//!
//! Lower values are evaluated first. Built-in implementations expose their
//! precedence as a plain `i32` that can be overridden at construction time,
//! so the evaluation order is configuration, not a hidden constant.

/// Highest possible precedence, evaluated before everything else.
pub const HIGHEST_PRECEDENCE: i32 = i32::MIN;

/// Lowest possible precedence, evaluated after everything else.
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;
