//! Language rules for what makes a directory an importable package

/// Naming rules of a language ecosystem's packages
pub trait PackageConvention {
    /// File whose presence marks a directory as a package (e.g. `__init__.py`)
    fn marker_file_name(&self) -> &str;

    /// Source file extension including the dot (e.g. `.py`)
    fn source_extension(&self) -> &str;

    /// Whether a target path names a source file rather than a package
    fn is_source_path(&self, path: &str) -> bool {
        path.ends_with(self.source_extension())
    }
}

/// Convention given by two fixed names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticConvention {
    pub marker_file_name: String,
    pub source_extension: String,
}

impl StaticConvention {
    pub fn new(marker_file_name: impl Into<String>, source_extension: impl Into<String>) -> Self {
        Self {
            marker_file_name: marker_file_name.into(),
            source_extension: source_extension.into(),
        }
    }
}

impl PackageConvention for StaticConvention {
    fn marker_file_name(&self) -> &str {
        &self.marker_file_name
    }

    fn source_extension(&self) -> &str {
        &self.source_extension
    }
}
