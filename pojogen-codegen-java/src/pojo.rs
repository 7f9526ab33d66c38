//! Java POJO source renderer.

use pojogen_codegen::{
    FieldSpec, ImportContext, ImportResolver, ModelError, PojoClass, Renderer,
    builder::CodeBuilder,
    model::{to_java_doc, types},
};
use pojogen_mapping::PropertyBinding;

const DEFAULT_DOC: &str = "Generated by pojogen";

/// Renders one Java source file per class model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PojoRenderer;

impl PojoRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for PojoRenderer {
    fn category(&self) -> &'static str {
        "java"
    }

    fn render(
        &self,
        pojo: &PojoClass<'_>,
        imports: &mut ImportContext,
    ) -> Result<String, ModelError> {
        // The body decides which imports are needed, so it goes first.
        let mut body = CodeBuilder::java();
        body.push_indent();
        let fields = pojo.fields()?;
        if pojo.is_interface() {
            render_abstract_accessors(&mut body, &fields, imports);
        } else {
            render_fields(&mut body, &fields, imports);
            render_constructors(&mut body, pojo, imports)?;
            render_accessors(&mut body, &fields, imports);
            render_to_string(&mut body, pojo, &fields, imports)?;
            render_equals_hash_code(&mut body, pojo, &fields, imports)?;
        }
        if let Some(code) = pojo.extra_class_code() {
            body.push_blank().push_lines(&code);
        }
        body.push_dedent();

        let mut header = vec![
            pojo.class_modifiers(),
            pojo.declaration_type().to_string(),
            pojo.declaration_name().to_string(),
            pojo.extends_declaration(imports),
            pojo.implements_declaration(imports),
        ];
        header.retain(|part| !part.is_empty());

        let mut out = CodeBuilder::java();
        let package = pojo.package_declaration();
        if !package.is_empty() {
            out.push_line(&package).push_blank();
        }
        let import_block = imports.generate_imports();
        if !import_block.is_empty() {
            out.push_raw(&import_block).push_blank();
        }
        let fallback = pojo
            .options()
            .doc_fallback
            .as_deref()
            .unwrap_or(DEFAULT_DOC);
        out.push_javadoc(&pojo.class_java_doc(fallback, out.column()));
        out.push_line(&format!("{} {{", header.join(" ")));
        out.push_raw(body.as_str());
        out.push_line("}");
        Ok(out.build())
    }
}

fn render_fields(body: &mut CodeBuilder, fields: &[FieldSpec], imports: &mut ImportContext) {
    body.push_blank();
    for field in fields {
        if let Some(doc) = &field.doc {
            body.push_javadoc(&to_java_doc(doc, body.column()));
        }
        let java_type = imports.import_type(&field.type_name);
        let line = match &field.initializer {
            Some(implementation) => {
                let diamond = if java_type.contains('<') { "<>" } else { "" };
                format!(
                    "{} {} {} = new {}{}(0);",
                    field.field_scope,
                    java_type,
                    field.name,
                    imports.import_type(implementation),
                    diamond
                )
            }
            None => format!("{} {} {};", field.field_scope, java_type, field.name),
        };
        body.push_line(&line);
    }
}

fn render_constructors(
    body: &mut CodeBuilder,
    pojo: &PojoClass<'_>,
    imports: &mut ImportContext,
) -> Result<(), ModelError> {
    let name = pojo.declaration_name();
    body.push_blank()
        .push_open(&format!("public {}() {{", name))
        .push_close("}");

    if pojo.needs_minimal_constructor() {
        render_constructor(
            body,
            pojo,
            &pojo.properties_for_minimal_constructor(),
            &pojo.properties_for_super_minimal_constructor(),
            imports,
        )?;
    }
    if pojo.needs_full_constructor() {
        render_constructor(
            body,
            pojo,
            &pojo.properties_for_full_constructor(),
            &pojo.properties_for_super_constructor(),
            imports,
        )?;
    }
    Ok(())
}

fn render_constructor<'a>(
    body: &mut CodeBuilder,
    pojo: &PojoClass<'a>,
    properties: &[&'a PropertyBinding],
    super_properties: &[&'a PropertyBinding],
    imports: &mut ImportContext,
) -> Result<(), ModelError> {
    let parameters = pojo.as_parameter_list(properties, imports)?;
    body.push_blank()
        .push_open(&format!("public {}({}) {{", pojo.declaration_name(), parameters));
    if !super_properties.is_empty() {
        body.push_line(&format!("super({});", pojo.as_argument_list(super_properties)));
    }
    for property in &properties[super_properties.len()..] {
        body.push_line(&format!("this.{0} = {0};", property.name));
    }
    body.push_close("}");
    Ok(())
}

fn render_accessors(body: &mut CodeBuilder, fields: &[FieldSpec], imports: &mut ImportContext) {
    for field in fields {
        let java_type = imports.import_type(&field.type_name);
        body.push_blank()
            .push_open(&format!(
                "{} {} {}() {{",
                field.getter_scope, java_type, field.getter
            ))
            .push_line(&format!("return this.{};", field.name))
            .push_close("}");
        body.push_blank()
            .push_open(&format!(
                "{} void {}({} {}) {{",
                field.setter_scope, field.setter, java_type, field.name
            ))
            .push_line(&format!("this.{0} = {0};", field.name))
            .push_close("}");
    }
}

fn render_abstract_accessors(
    body: &mut CodeBuilder,
    fields: &[FieldSpec],
    imports: &mut ImportContext,
) {
    for field in fields {
        let java_type = imports.import_type(&field.type_name);
        body.push_blank()
            .push_line(&format!("public {} {}();", java_type, field.getter))
            .push_line(&format!(
                "public void {}({} {});",
                field.setter, java_type, field.name
            ));
    }
}

fn field_for<'f>(fields: &'f [FieldSpec], property: &PropertyBinding) -> Option<&'f FieldSpec> {
    fields.iter().find(|f| f.name == property.name)
}

fn render_to_string(
    body: &mut CodeBuilder,
    pojo: &PojoClass<'_>,
    fields: &[FieldSpec],
    imports: &mut ImportContext,
) -> Result<(), ModelError> {
    if !pojo.needs_to_string() {
        return Ok(());
    }
    // Mapped types can claim these java.lang names first.
    let string = imports.import_type("java.lang.String");
    let builder = imports.import_type("java.lang.StringBuilder");
    let integer = imports.import_type("java.lang.Integer");
    body.push_blank()
        .push_line(&format!("@{}", imports.import_type("java.lang.Override")))
        .push_open(&format!("public {} toString() {{", string))
        .push_line(&format!("{0} buffer = new {0}();", builder))
        .push_line(&format!(
            "buffer.append(getClass().getName()).append(\"@\")\
             .append({}.toHexString(hashCode())).append(\" [\");",
            integer
        ));
    for property in pojo.to_string_properties() {
        if let Some(field) = field_for(fields, property) {
            body.push_line(&format!(
                "buffer.append(\"{}\").append(\"='\").append({}()).append(\"' \");",
                field.name, field.getter
            ));
        }
    }
    body.push_line("buffer.append(\"]\");")
        .push_line("return buffer.toString();")
        .push_close("}");
    Ok(())
}

fn render_equals_hash_code(
    body: &mut CodeBuilder,
    pojo: &PojoClass<'_>,
    fields: &[FieldSpec],
    imports: &mut ImportContext,
) -> Result<(), ModelError> {
    if !pojo.needs_equals_hash_code() {
        return Ok(());
    }
    let name = pojo.declaration_name();
    let selected: Vec<&FieldSpec> = pojo
        .equals_hash_code_properties()
        .into_iter()
        .filter_map(|property| field_for(fields, property))
        .collect();

    let comparisons: Vec<String> = selected
        .iter()
        .map(|field| {
            let getter = &field.getter;
            if types::is_primitive(&imports.import_type(&field.type_name)) {
                format!("(this.{0}() == castOther.{0}())", getter)
            } else {
                format!(
                    "((this.{0}() == castOther.{0}()) || (this.{0}() != null && \
                     castOther.{0}() != null && this.{0}().equals(castOther.{0}())))",
                    getter
                )
            }
        })
        .collect();

    let override_annotation = format!("@{}", imports.import_type("java.lang.Override"));
    let object = imports.import_type("java.lang.Object");
    body.push_blank()
        .push_line(&override_annotation)
        .push_open(&format!("public boolean equals({} other) {{", object))
        .push_line("if (this == other) return true;")
        .push_line("if (other == null) return false;")
        .push_line(&format!("if (!(other instanceof {})) return false;", name))
        .push_line(&format!("{0} castOther = ({0}) other;", name))
        .push_line(&format!("return {};", comparisons.join("\n        && ")))
        .push_close("}");

    body.push_blank()
        .push_line(&override_annotation)
        .push_open("public int hashCode() {")
        .push_line("int result = 17;");
    for field in &selected {
        let java_type = imports.import_type(&field.type_name);
        let hash = match java_type.as_str() {
            "boolean" => format!("(this.{}() ? 1 : 0)", field.getter),
            "long" => format!(
                "(int) (this.{0}() ^ (this.{0}() >>> 32))",
                field.getter
            ),
            primitive if types::is_primitive(primitive) => {
                format!("(int) this.{}()", field.getter)
            }
            _ => format!(
                "(this.{0}() == null ? 0 : this.{0}().hashCode())",
                field.getter
            ),
        };
        body.push_line(&format!("result = 37 * result + {};", hash));
    }
    body.push_line("return result;").push_close("}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pojogen_codegen::ModelOptions;
    use pojogen_mapping::{
        CollectionBinding, CollectionKind, MetaAttribute, Metadata, PersistentClassBinding,
        meta_keys,
    };

    use super::*;

    fn render(metadata: &Metadata, entity: &str, options: &ModelOptions) -> String {
        let binding = metadata.entity_binding(entity).unwrap();
        let pojo = PojoClass::for_entity(metadata, binding, options);
        let mut imports = ImportContext::for_class(pojo.qualified_declaration_name());
        PojoRenderer::new().render(&pojo, &mut imports).unwrap()
    }

    #[test]
    fn test_render_simple_class() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("org.test.Note")
                .identifier(PropertyBinding::simple("id", "long").nullable(false), "native")
                .property(PropertyBinding::simple("text", "string")),
        );
        let source = render(&metadata, "org.test.Note", &ModelOptions::default());

        insta::assert_snapshot!(source, @r"
package org.test;

import java.io.Serializable;

/**
 * Generated by pojogen
 */
public class Note implements Serializable {

    private long id;
    private String text;

    public Note() {
    }

    public Note(String text) {
        this.text = text;
    }

    public long getId() {
        return this.id;
    }

    public void setId(long id) {
        this.id = id;
    }

    public String getText() {
        return this.text;
    }

    public void setText(String text) {
        this.text = text;
    }
}
");
    }

    #[test]
    fn test_declared_class_wins_simple_name() {
        let mut metadata = Metadata::new();
        metadata.add(PersistentClassBinding::root("org.b.Order"));
        metadata.add(
            PersistentClassBinding::root("org.a.Order")
                .property(PropertyBinding::many_to_one("legacy", "org.b.Order")),
        );
        let source = render(&metadata, "org.a.Order", &ModelOptions::default());

        assert!(!source.contains("import org.b.Order;"));
        assert!(source.contains("public class Order implements Serializable {\n"));
        assert!(source.contains("    private org.b.Order legacy;\n"));
        assert!(source.contains("    public org.b.Order getLegacy() {\n"));
    }

    #[test]
    fn test_mapped_type_shadows_java_lang_names() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("org.test.Label").property(
                PropertyBinding::simple("text", "org.i18n.String")
                    .meta(MetaAttribute::new(meta_keys::USE_IN_TOSTRING, "true"))
                    .meta(MetaAttribute::new(meta_keys::USE_IN_EQUALS, "true")),
            ),
        );
        let source = render(&metadata, "org.test.Label", &ModelOptions::default());

        assert!(source.contains("import org.i18n.String;\n"));
        assert!(source.contains("    private String text;\n"));
        assert!(source.contains("    public java.lang.String toString() {\n"));
        assert!(source.contains("StringBuilder buffer = new StringBuilder();"));
        assert!(!source.contains("import java.lang."));
    }

    #[test]
    fn test_render_interface() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("org.test.HelloWorld")
                .meta(MetaAttribute::new(meta_keys::INTERFACE, "true"))
                .identifier(PropertyBinding::simple("id", "string"), "assigned")
                .property(PropertyBinding::simple("hello", "string")),
        );
        let source = render(&metadata, "org.test.HelloWorld", &ModelOptions::default());

        assert!(source.contains("public interface HelloWorld {\n"));
        assert!(source.contains("    public String getHello();\n"));
        assert!(source.contains("    public void setHello(String hello);\n"));
        assert!(!source.contains("implements"));
        assert!(!source.contains("private"));
        assert!(!source.contains("import"));
    }

    #[test]
    fn test_render_collections_with_generics() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("org.test.Item")
                .identifier(PropertyBinding::simple("id", "long"), "native"),
        );
        metadata.add(
            PersistentClassBinding::root("org.test.Cart")
                .identifier(PropertyBinding::simple("id", "long"), "native")
                .property(PropertyBinding::collection(
                    "items",
                    CollectionBinding::new(CollectionKind::Set, "org.test.Item"),
                )),
        );
        let options = ModelOptions {
            generics: true,
            ..ModelOptions::default()
        };
        let source = render(&metadata, "org.test.Cart", &options);

        assert!(source.contains("import java.util.HashSet;\n"));
        assert!(source.contains("import java.util.Set;\n"));
        assert!(source.contains("    private Set<org.test.Item> items = new HashSet<>(0);\n"));
        assert!(source.contains("    public Cart(Set<org.test.Item> items) {\n"));
    }

    #[test]
    fn test_render_equals_hash_code_and_to_string() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("org.test.Person")
                .identifier(
                    PropertyBinding::simple("id", "long")
                        .nullable(false)
                        .meta(MetaAttribute::new(meta_keys::USE_IN_EQUALS, "true")),
                    "native",
                )
                .property(
                    PropertyBinding::simple("email", "string")
                        .meta(MetaAttribute::new(meta_keys::USE_IN_EQUALS, "true"))
                        .meta(MetaAttribute::new(meta_keys::USE_IN_TOSTRING, "true")),
                ),
        );
        let source = render(&metadata, "org.test.Person", &ModelOptions::default());

        assert!(source.contains("    public boolean equals(Object other) {\n"));
        assert!(source.contains("if (!(other instanceof Person)) return false;"));
        assert!(source.contains("return (this.getId() == castOther.getId())\n"));
        assert!(source.contains("this.getEmail().equals(castOther.getEmail())"));
        assert!(source.contains("result = 37 * result + (int) (this.getId() ^ (this.getId() >>> 32));"));
        assert!(source.contains(
            "result = 37 * result + (this.getEmail() == null ? 0 : this.getEmail().hashCode());"
        ));
        assert!(source.contains("buffer.append(\"email\").append(\"='\").append(getEmail())"));
        assert!(!source.contains("append(getId())"));
    }

    #[test]
    fn test_render_subclass_calls_super() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("org.test.Base")
                .identifier(PropertyBinding::simple("id", "string").nullable(false), "assigned")
                .property(PropertyBinding::simple("name", "string")),
        );
        metadata.add(
            PersistentClassBinding::subclass("org.test.Sub", "org.test.Base")
                .property(PropertyBinding::simple("extra", "integer")),
        );
        let source = render(&metadata, "org.test.Sub", &ModelOptions::default());

        assert!(source.contains("public class Sub extends Base {\n"));
        assert!(source.contains("    public Sub(String id, String name, Integer extra) {\n"));
        assert!(source.contains("        super(id, name);\n        this.extra = extra;\n"));
        assert!(source.contains("    public Sub(String id) {\n        super(id);\n    }\n"));
        assert!(!source.contains("private String id;"));
    }

    #[test]
    fn test_render_docs_and_class_code() {
        let mut metadata = Metadata::new();
        metadata.add(
            PersistentClassBinding::root("Memo")
                .meta(MetaAttribute::new(meta_keys::CLASS_DESCRIPTION, "A memo."))
                .meta(MetaAttribute::new(meta_keys::CLASS_CODE, "public static final int MAX = 3;"))
                .identifier(
                    PropertyBinding::simple("id", "long")
                        .meta(MetaAttribute::new(meta_keys::FIELD_DESCRIPTION, "Key")),
                    "native",
                ),
        );
        let source = render(&metadata, "Memo", &ModelOptions::default());

        assert!(source.starts_with("import java.io.Serializable;\n\n/**\n * A memo.\n */\n"));
        assert!(source.contains("    /**\n     * Key\n     */\n    private Long id;\n"));
        assert!(source.contains("\n    public static final int MAX = 3;\n}\n"));
    }
}
