//! Extract Superclass refactoring
//!
//! Creates a new class holding some of a class's superclasses, places it with
//! the [`TargetLocationResolver`], and makes the original class inherit from
//! it. `object` is always pulled up into the new class when the original
//! lists it.
//!
//! Placement runs before any text is edited, so a placement failure cancels
//! the refactoring without touching the source. Directories and markers that
//! placement already created stay (no rollback).

use crate::class_def::{find_class, is_identifier, render_header};
use crate::convention::{PythonConvention, INIT_DOT_PY};
use crate::imports;
use std::path::Path;
use stow_config::logging::placement_span;
use stow_config::PlacementConfig;
use stow_foundation::path::normalize_root;
use stow_foundation::{FileHandle, PlacementResult, StowError, StowResult};
use stow_placement::{ProjectStorage, TargetLocationResolver};
use tracing::{debug, info, warn};

const OBJECT: &str = "object";

/// What to extract, and where to
#[derive(Debug, Clone)]
pub struct ExtractSuperclassRequest {
    /// File declaring the class being refactored
    pub source_file: FileHandle,
    pub class_name: String,
    /// Name of the superclass to create
    pub new_base_name: String,
    /// Destination: file, package directory, or a path yet to be created
    pub target_path: String,
    /// Base list entries to move into the new class
    pub selected_superclasses: Vec<String>,
}

/// Result of a completed extraction
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub placement: PlacementResult,
    /// Module the source file now imports the new class from
    pub imported_from: Option<String>,
    /// The new class landed in a file with no module name (the root's own
    /// `__init__.py`), so the source file has no import for it
    pub import_skipped: bool,
    /// Superclasses that moved into the new class, in their original order
    pub moved_superclasses: Vec<String>,
}

pub struct ExtractSuperclass<'a> {
    storage: &'a dyn ProjectStorage,
    config: &'a PlacementConfig,
}

impl<'a> ExtractSuperclass<'a> {
    pub fn new(storage: &'a dyn ProjectStorage, config: &'a PlacementConfig) -> Self {
        Self { storage, config }
    }

    pub fn extract<S: AsRef<str>>(
        &self,
        roots: &[S],
        request: &ExtractSuperclassRequest,
    ) -> StowResult<ExtractOutcome> {
        let span = placement_span(&request.target_path);
        let _enter = span.enter();

        if !is_identifier(&request.new_base_name) {
            return Err(StowError::invalid_input(format!(
                "'{}' is not a valid class name",
                request.new_base_name
            )));
        }

        if request.new_base_name == request.class_name {
            return Err(StowError::invalid_input(format!(
                "class {} cannot be its own superclass",
                request.class_name
            )));
        }

        let source_text = self.read(&request.source_file)?;
        let class = find_class(&source_text, &request.class_name)?;
        if class.has_base(&request.new_base_name) {
            return Err(StowError::invalid_input(format!(
                "class {} already inherits from {}",
                request.class_name, request.new_base_name
            )));
        }

        let moved: Vec<String> = class
            .bases
            .iter()
            .filter(|base| *base == OBJECT || request.selected_superclasses.contains(base))
            .cloned()
            .collect();
        debug!(class = %class.name, moved = ?moved, "Collected superclasses to move");

        let convention = PythonConvention;
        let resolver = TargetLocationResolver::new(self.storage, &convention)
            .with_marker_content(self.config.marker_content.clone());
        let placement = resolver.resolve(
            roots,
            &request.target_path,
            Some(&request.source_file),
        )?;

        let mut imported_from = None;
        let mut import_skipped = false;
        let source_text = if placement.inserts_before_declaration() {
            let declaration = self.render_class(&request.new_base_name, &moved, &class.indent);
            let mut text = String::with_capacity(source_text.len() + declaration.len() + 4);
            text.push_str(&source_text[..class.insert_offset]);
            text.push_str(&declaration);
            text.push_str(&self.config.separator());
            text.push_str(&source_text[class.insert_offset..]);
            text
        } else {
            let root = roots
                .get(placement.root_index)
                .map(|root| normalize_root(root.as_ref()))
                .unwrap_or_default();
            let module = imports::module_path(Path::new(&root), placement.file.path());
            if module.is_none() && placement.file.file_name() != Some(INIT_DOT_PY) {
                return Err(StowError::invalid_input(format!(
                    "{} is not a Python module",
                    placement.file.path().display()
                )));
            }

            let declaration = self.render_class(&request.new_base_name, &moved, "");
            let destination = self.read(&placement.file)?;
            let updated = self.append_declaration(&destination, &declaration);
            self.write(&placement.file, &updated)?;
            info!(file = %placement.file.path().display(), class = %request.new_base_name, "Appended new class");

            match module {
                Some(module) => {
                    let text = imports::insert_from_import(
                        &source_text,
                        &module,
                        &request.new_base_name,
                    );
                    imported_from = Some(module);
                    text
                }
                None => {
                    warn!(
                        file = %placement.file.path().display(),
                        "Destination has no module name, skipping import"
                    );
                    import_skipped = true;
                    source_text
                }
            }
        };

        // Offsets moved with the edits above
        let class = find_class(&source_text, &request.class_name)?;
        let mut bases: Vec<String> = class
            .bases
            .iter()
            .filter(|base| !moved.contains(base))
            .cloned()
            .collect();
        bases.push(request.new_base_name.clone());
        let source_text = class.replace_bases(&source_text, &bases);
        self.write(&request.source_file, &source_text)?;

        info!(
            class = %request.class_name,
            new_base = %request.new_base_name,
            kind = ?placement.kind,
            "Extracted superclass"
        );

        Ok(ExtractOutcome {
            placement,
            imported_from,
            import_skipped,
            moved_superclasses: moved,
        })
    }

    /// Class with the given bases and an empty body, indented by `indent`
    fn render_class(&self, name: &str, bases: &[String], indent: &str) -> String {
        format!(
            "{}\n{}{}pass\n",
            render_header(indent, name, bases),
            indent,
            self.config.indent()
        )
    }

    /// `existing` followed by `declaration`, separated by the configured blank lines
    fn append_declaration(&self, existing: &str, declaration: &str) -> String {
        if existing.is_empty() {
            return declaration.to_string();
        }
        let mut text = existing.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.config.separator());
        text.push_str(declaration);
        text
    }

    fn read(&self, file: &FileHandle) -> StowResult<String> {
        self.storage
            .read_content(file)
            .map_err(|e| StowError::io_at(file.path(), e))
    }

    fn write(&self, file: &FileHandle, text: &str) -> StowResult<()> {
        self.storage
            .set_content(file, text)
            .map_err(|e| StowError::io_at(file.path(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stow_foundation::PlacementKind;
    use stow_placement::InMemoryStorage;

    const SOURCE: &str = "/proj/src/shapes.py";

    fn request(target: &str, selected: &[&str]) -> ExtractSuperclassRequest {
        ExtractSuperclassRequest {
            source_file: FileHandle::new(SOURCE),
            class_name: "Square".to_string(),
            new_base_name: "Shape".to_string(),
            target_path: target.to_string(),
            selected_superclasses: selected.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn storage_with_source(text: &str) -> InMemoryStorage {
        let storage = InMemoryStorage::with_directories(&["/proj/src"]);
        storage.add_file(SOURCE, text);
        storage
    }

    #[test]
    fn test_same_file_inserts_before_class() {
        let storage = storage_with_source("import os\n\n@register\nclass Square(object, Drawable):\n    side = 1\n");
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let outcome = action
            .extract(&["/proj/src"], &request(SOURCE, &["Drawable"]))
            .unwrap();

        assert_eq!(outcome.placement.kind, PlacementKind::SameFile);
        assert_eq!(outcome.moved_superclasses, vec!["object", "Drawable"]);
        assert_eq!(outcome.imported_from, None);
        assert!(!outcome.import_skipped);
        assert_eq!(
            storage.content(SOURCE).unwrap(),
            "import os\n\nclass Shape(object, Drawable):\n    pass\n\n\n@register\nclass Square(Shape):\n    side = 1\n"
        );
        assert!(!storage.contains("/proj/src/__init__.py"));
    }

    #[test]
    fn test_new_package_gets_class_and_import() {
        let storage = storage_with_source("class Square(Drawable, Comparable):\n    pass\n");
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let outcome = action
            .extract(&["/proj/src"], &request("/proj/src/geometry/base", &["Comparable"]))
            .unwrap();

        assert_eq!(outcome.placement.kind, PlacementKind::PackageMarker);
        assert_eq!(outcome.imported_from.as_deref(), Some("geometry.base"));
        assert_eq!(
            storage.content("/proj/src/geometry/base/__init__.py").unwrap(),
            "class Shape(Comparable):\n    pass\n"
        );
        assert_eq!(storage.content("/proj/src/geometry/__init__.py").unwrap(), "");
        assert_eq!(
            storage.content(SOURCE).unwrap(),
            "from geometry.base import Shape\n\nclass Square(Drawable, Shape):\n    pass\n"
        );
    }

    #[test]
    fn test_existing_file_gets_separator() {
        let storage = storage_with_source("import os\n\nclass Square:\n    pass\n");
        storage.add_file("/proj/src/base.py", "VERSION = 2");
        let config = PlacementConfig {
            blank_lines_before_declaration: 1,
            ..PlacementConfig::default()
        };
        let action = ExtractSuperclass::new(&storage, &config);

        action
            .extract(&["/proj/src"], &request("/proj/src/base.py", &[]))
            .unwrap();

        assert_eq!(
            storage.content("/proj/src/base.py").unwrap(),
            "VERSION = 2\n\nclass Shape:\n    pass\n"
        );
        assert_eq!(
            storage.content(SOURCE).unwrap(),
            "import os\nfrom base import Shape\n\nclass Square(Shape):\n    pass\n"
        );
    }

    #[test]
    fn test_root_marker_gets_no_import() {
        let storage = storage_with_source("class Square:\n    pass\n");
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let outcome = action
            .extract(&["/proj/src"], &request("/proj/src", &[]))
            .unwrap();

        assert_eq!(outcome.imported_from, None);
        assert!(outcome.import_skipped);
        assert_eq!(
            storage.content("/proj/src/__init__.py").unwrap(),
            "class Shape:\n    pass\n"
        );
        assert_eq!(storage.content(SOURCE).unwrap(), "class Square(Shape):\n    pass\n");
    }

    #[test]
    fn test_failed_placement_leaves_source_untouched() {
        let original = "class Square(Mixin):\n    pass\n";
        let storage = storage_with_source(original);
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let err = action
            .extract(&["/proj/src"], &request("/tmp/elsewhere.py", &["Mixin"]))
            .unwrap_err();

        assert!(matches!(err, StowError::NoContainingRoot { .. }));
        assert_eq!(storage.content(SOURCE).unwrap(), original);
    }

    #[test]
    fn test_invalid_requests_fail_early() {
        let storage = storage_with_source("class Square(Shape):\n    pass\n");
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let mut bad_name = request("/proj/src/base.py", &[]);
        bad_name.new_base_name = "not valid".to_string();
        assert!(matches!(
            action.extract(&["/proj/src"], &bad_name),
            Err(StowError::InvalidInput { .. })
        ));

        let already = request("/proj/src/base.py", &[]);
        assert!(matches!(
            action.extract(&["/proj/src"], &already),
            Err(StowError::InvalidInput { .. })
        ));

        let mut missing = request("/proj/src/base.py", &[]);
        missing.class_name = "Circle".to_string();
        assert!(matches!(
            action.extract(&["/proj/src"], &missing),
            Err(StowError::NotFound { .. })
        ));
        assert!(!storage.contains("/proj/src/base.py"));
    }

    #[test]
    fn test_base_named_like_the_class_is_rejected() {
        let original = "class Square(Drawable):\n    pass\n";
        let storage = storage_with_source(original);
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let mut same_name = request(SOURCE, &["Drawable"]);
        same_name.new_base_name = "Square".to_string();
        let err = action.extract(&["/proj/src"], &same_name).unwrap_err();

        assert!(matches!(err, StowError::InvalidInput { .. }));
        assert_eq!(storage.content(SOURCE).unwrap(), original);
    }

    #[test]
    fn test_non_python_destination_is_rejected_before_editing() {
        let original = "class Square(Drawable):\n    pass\n";
        let storage = storage_with_source(original);
        storage.add_file("/proj/src/README.txt", "Shapes\n");
        let config = PlacementConfig::default();
        let action = ExtractSuperclass::new(&storage, &config);

        let err = action
            .extract(&["/proj/src"], &request("/proj/src/README.txt", &["Drawable"]))
            .unwrap_err();

        assert!(matches!(err, StowError::InvalidInput { .. }));
        assert_eq!(storage.content(SOURCE).unwrap(), original);
        assert_eq!(storage.content("/proj/src/README.txt").unwrap(), "Shapes\n");
    }
}
