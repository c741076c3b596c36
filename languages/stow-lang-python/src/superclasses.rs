//! Moving superclass entries between class headers

use crate::class_def::find_class;
use stow_foundation::StowResult;
use tracing::debug;

/// Base list entries of `class_name` that could be moved elsewhere
pub fn movable_superclasses(text: &str, class_name: &str) -> StowResult<Vec<String>> {
    Ok(find_class(text, class_name)?.bases)
}

/// Append `names` to the bases of `class_name`, skipping ones already present
pub fn add_superclasses(text: &str, class_name: &str, names: &[String]) -> StowResult<String> {
    let class = find_class(text, class_name)?;
    let mut bases = class.bases.clone();
    for name in names {
        if !bases.contains(name) {
            bases.push(name.clone());
        }
    }
    if bases == class.bases {
        return Ok(text.to_string());
    }
    Ok(class.replace_bases(text, &bases))
}

/// Drop the bases of `class_name` whose text equals one of `names`
pub fn remove_superclasses(text: &str, class_name: &str, names: &[String]) -> StowResult<String> {
    let class = find_class(text, class_name)?;
    let bases: Vec<String> = class
        .bases
        .iter()
        .filter(|base| !names.contains(base))
        .cloned()
        .collect();
    if bases.len() == class.bases.len() {
        return Ok(text.to_string());
    }
    Ok(class.replace_bases(text, &bases))
}

/// Move superclass entries from one class to another in the same text.
///
/// The destination gains every name first; then source bases matching a name
/// are deleted. Names the source does not list are still added.
pub fn move_superclasses(
    text: &str,
    from_class: &str,
    to_class: &str,
    names: &[String],
) -> StowResult<String> {
    // Fail before touching anything if either class is missing
    find_class(text, from_class)?;
    find_class(text, to_class)?;

    let text = add_superclasses(text, to_class, names)?;
    let text = remove_superclasses(&text, from_class, names)?;
    debug!(from = %from_class, to = %to_class, moved = ?names, "Moved superclasses");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stow_foundation::StowError;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_movable_superclasses() {
        let text = "class A(Base, Mixin):\n    pass\n";
        assert_eq!(movable_superclasses(text, "A").unwrap(), names(&["Base", "Mixin"]));
    }

    #[test]
    fn test_move_between_classes() {
        let text = "class Parent:\n    pass\n\n\nclass Child(Parent, Mixin, Serializable):\n    pass\n";
        let moved = move_superclasses(text, "Child", "Parent", &names(&["Mixin", "Serializable"]))
            .unwrap();
        assert_eq!(
            moved,
            "class Parent(Mixin, Serializable):\n    pass\n\n\nclass Child(Parent):\n    pass\n"
        );
    }

    #[test]
    fn test_last_base_removed_drops_parentheses() {
        let text = "class A(Mixin):\n    pass\n";
        let updated = remove_superclasses(text, "A", &names(&["Mixin"])).unwrap();
        assert_eq!(updated, "class A:\n    pass\n");
    }

    #[test]
    fn test_add_skips_duplicates_and_keeps_text() {
        let text = "class A(Mixin):  # keep formatting\n    pass\n";
        assert_eq!(add_superclasses(text, "A", &names(&["Mixin"])).unwrap(), text);
    }

    #[test]
    fn test_missing_destination_changes_nothing() {
        let text = "class Child(Mixin):\n    pass\n";
        let err = move_superclasses(text, "Child", "Ghost", &names(&["Mixin"])).unwrap_err();
        assert!(matches!(err, StowError::NotFound { .. }));
    }
}
