//! Check operation - mapping validation.

use std::path::Path;

use pojogen_codegen::{Exporter, ModelOptions, PojoClass, pipeline::Unit};
use pojogen_mapping::Metadata;

use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Builds the class model of every unit and records the ones whose
/// metadata cannot be turned into a class.
pub fn check(metadata: &Metadata, mapping_path: &Path, options: &ModelOptions) -> CheckReport {
    let units = Exporter::units(metadata, options);

    let mut errors = Vec::new();
    let mut component_count = 0;
    for unit in &units {
        let pojo = match *unit {
            Unit::Entity(binding) => PojoClass::for_entity(metadata, binding, options),
            Unit::Component(component) => {
                component_count += 1;
                PojoClass::for_component(metadata, component, options)
            }
        };
        if let Err(err) = pojo.validate() {
            errors.push(err.to_string());
        }
    }

    CheckReport {
        mapping_path: mapping_path.to_path_buf(),
        entity_count: metadata.len(),
        component_count,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use pojogen_mapping::parse_str;

    use super::*;

    #[test]
    fn test_check_counts_units() {
        let metadata = parse_str(
            r#"
            [[class]]
            name = "org.demo.Person"

            [class.id]
            name = "id"
            type = "long"

            [[class.property]]
            name = "home"

            [class.property.component]
            class = "org.demo.Address"

            [[class.property.component.property]]
            name = "street"
            type = "string"
            "#,
        )
        .unwrap();

        let report = check(&metadata, Path::new("mapping.toml"), &ModelOptions::default());

        assert!(report.is_valid());
        assert_eq!(report.entity_count, 1);
        assert_eq!(report.component_count, 1);
    }

    #[test]
    fn test_check_reports_unknown_types() {
        let metadata = parse_str(
            r#"
            [[class]]
            name = "Gadget"

            [class.id]
            name = "id"
            type = "long"

            [[class.property]]
            name = "size"
            type = "huge"
            "#,
        )
        .unwrap();

        let report = check(&metadata, Path::new("mapping.toml"), &ModelOptions::default());

        assert!(!report.is_valid());
        assert_eq!(
            report.errors,
            vec!["malformed metadata for 'Gadget.size': unknown type 'huge'"]
        );
    }
}
