//! Dependency data model.
//!
//! - [`capability`] - Capabilities and their dependency classes
//! - [`set`] - Class-partitioned capability sets
//! - [`component`] - Package components and file records
//! - [`magic`] - `#!` interpreter detection

pub mod capability;
pub mod component;
pub mod magic;
pub mod set;

pub use capability::{Capability, DepClass};
pub use component::{split_component, FileRecord, PackageComponent};
pub use magic::{read_interpreter, script_interpreter};
pub use set::CapabilitySet;
