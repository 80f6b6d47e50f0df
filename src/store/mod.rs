//! Persistence layer: point lookups and writes over users and tasks.
//!
//! Task queries always take an explicit owner id and include it in the WHERE
//! clause, so a task belonging to another user is indistinguishable from an
//! absent one at this layer.

pub mod tasks;
pub mod users;
