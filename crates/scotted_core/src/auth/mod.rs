//! Consumed authentication capability.
//!
//! Authentication itself lives outside this crate; only the decision of what
//! a protected route should do with the current auth state lives here.

pub mod route_guard;
