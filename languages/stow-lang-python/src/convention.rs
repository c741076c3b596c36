//! Python package naming rules

use stow_placement::PackageConvention;

/// Marker that makes a directory an importable package
pub const INIT_DOT_PY: &str = "__init__.py";

/// Extension of Python source files
pub const PY_EXTENSION: &str = ".py";

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonConvention;

impl PackageConvention for PythonConvention {
    fn marker_file_name(&self) -> &str {
        INIT_DOT_PY
    }

    fn source_extension(&self) -> &str {
        PY_EXTENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_paths() {
        let convention = PythonConvention;
        assert!(convention.is_source_path("/proj/src/pkg/base.py"));
        assert!(!convention.is_source_path("/proj/src/pkg/base"));
        assert!(!convention.is_source_path("/proj/src/pkg/happy"));
        assert_eq!(convention.marker_file_name(), "__init__.py");
    }
}
