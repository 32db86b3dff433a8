//! Core types for module ID assignment.

pub mod module;
pub mod order;
pub mod namespace;
pub mod assignment;

pub use module::{ModuleKey, ModuleId};
pub use order::OrderKey;
pub use namespace::{UsedIds, NamespaceExhausted};
pub use assignment::{ModuleIdAssignment, AssignedModule, AssignmentStats};
