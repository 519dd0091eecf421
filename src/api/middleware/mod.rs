//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Rate limiter — reject early, save resources
//! 2. Identity — dashboard routes only, injects `UserContext`
//! 3. Access log — method, path, caller, status

pub mod access_log;
pub mod identity;
pub mod rate;
