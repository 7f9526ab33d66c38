use std::path::PathBuf;

use crate::{ImportContext, ModelError, PojoClass};

/// Turns one class model into the text of one artifact.
///
/// Renderers are shared by the worker threads of a run and must not keep
/// per-unit state; everything unit-specific lives in the arguments.
pub trait Renderer: Send + Sync {
    /// Category tag of the produced artifacts, also their file extension.
    fn category(&self) -> &'static str;

    /// Whether embedded component classes get an artifact of their own.
    fn renders_components(&self) -> bool {
        true
    }

    /// Output path below the destination directory.
    ///
    /// Defaults to the package path plus `DeclarationName.<category>`.
    fn relative_path(&self, pojo: &PojoClass<'_>) -> PathBuf {
        package_path(pojo.qualified_declaration_name(), self.category())
    }

    fn render(
        &self,
        pojo: &PojoClass<'_>,
        imports: &mut ImportContext,
    ) -> Result<String, ModelError>;
}

/// `a.b.C` with extension `java` becomes `a/b/C.java`.
pub fn package_path(qualified_name: &str, extension: &str) -> PathBuf {
    let mut path: PathBuf = qualified_name.split('.').collect();
    let file_name = format!(
        "{}.{}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension
    );
    path.set_file_name(file_name);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_path() {
        assert_eq!(
            package_path("org.test.Order", "java"),
            PathBuf::from("org/test/Order.java")
        );
        assert_eq!(
            package_path("Order", "hbm.xml"),
            PathBuf::from("Order.hbm.xml")
        );
    }
}
