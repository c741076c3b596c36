//! Python support for stow
//!
//! - [`PythonConvention`]: `__init__.py` packages and `.py` sources
//! - [`class_def`]: locating a class and rewriting its base list
//! - [`superclasses`]: moving superclass entries between classes
//! - [`imports`]: module paths and `from ... import ...` insertion
//! - [`ExtractSuperclass`]: the extract-superclass refactoring on top of the
//!   target location resolver

pub mod class_def;
pub mod convention;
pub mod extract_superclass;
pub mod imports;
pub mod superclasses;

pub use class_def::{find_class, is_identifier, ClassDef};
pub use convention::PythonConvention;
pub use extract_superclass::{ExtractOutcome, ExtractSuperclass, ExtractSuperclassRequest};
pub use superclasses::{move_superclasses, movable_superclasses};
