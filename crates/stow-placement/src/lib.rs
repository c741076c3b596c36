//! Placement of extracted declarations
//!
//! Given a project's ordered source roots and a target path, the
//! [`TargetLocationResolver`] finds or creates the file that will receive a
//! newly extracted declaration. Every directory it creates or walks through
//! gets a package marker so the new location stays importable.
//!
//! Storage goes through the narrow [`ProjectStorage`] capability, with a
//! real-filesystem backend ([`LocalStorage`]) and a deterministic in-memory
//! one ([`InMemoryStorage`]). Language rules (marker name, source extension)
//! come from a [`PackageConvention`].
//!
//! Resolution is synchronous and not atomic: concurrent resolutions over
//! overlapping paths must be serialized by the caller, and a failure leaves
//! whatever was already created in place.

pub mod convention;
pub mod local;
pub mod memory;
pub mod resolver;
pub mod storage;

pub use convention::{PackageConvention, StaticConvention};
pub use local::LocalStorage;
pub use memory::InMemoryStorage;
pub use resolver::TargetLocationResolver;
pub use storage::ProjectStorage;
