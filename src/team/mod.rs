//! Teams and their association with tasks.
//!
//! A team owns zero or more tasks through a weak reference stored on the
//! task. Associating and disassociating tasks goes through the task port, so
//! any list caching in front of that port sees the change.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
