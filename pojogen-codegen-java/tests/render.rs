use std::{fs, path::PathBuf};

use pojogen_codegen::{ArtifactCollector, ExportOptions, Exporter};
use pojogen_codegen_java::{HbmXmlRenderer, PojoRenderer};
use pojogen_core::{Settings, keys};
use pojogen_mapping::{Metadata, parse_str};
use tempfile::TempDir;

const SHOP: &str = r#"
[[class]]
name = "org.shop.Customer"
entity-name = "Customer"
table = "CUSTOMER"

[class.id]
name = "id"
type = "long"
generator = "native"

[[class.property]]
name = "name"
type = "string"
not-null = true

[[class.property]]
name = "address"

[class.property.component]
class = "org.shop.Address"

[[class.property.component.property]]
name = "city"
type = "string"

[[class.property]]
name = "orders"
collection = "set"
element = "Order"
key = ["CUSTOMER_ID"]
inverse = true

[[class]]
name = "org.shop.Order"
entity-name = "Order"

[class.id]
name = "id"
type = "long"
generator = "native"

[[class.property]]
name = "customer"
many-to-one = "Customer"
"#;

fn shop() -> Metadata {
    parse_str(SHOP).unwrap()
}

fn exporter() -> Exporter {
    Exporter::new()
        .renderer(PojoRenderer::new())
        .renderer(HbmXmlRenderer::new())
}

fn relative(paths: &[PathBuf], base: &TempDir) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| p.strip_prefix(base.path()).unwrap().to_path_buf())
        .collect()
}

#[test]
fn test_generate_sources_and_mappings() {
    let temp = TempDir::new().unwrap();
    let settings = Settings::new().set(keys::JDK5, "true");
    let options = ExportOptions::from_settings(temp.path(), &settings).unwrap();
    let collector = ArtifactCollector::new();

    let report = exporter().run(&shop(), &options, &collector).unwrap();

    assert!(report.is_clean());
    assert_eq!(
        relative(&report.written, &temp),
        vec![
            PathBuf::from("org/shop/Customer.java"),
            PathBuf::from("org/shop/Customer.hbm.xml"),
            PathBuf::from("org/shop/Order.java"),
            PathBuf::from("org/shop/Order.hbm.xml"),
            PathBuf::from("org/shop/Address.java"),
        ]
    );
    assert_eq!(collector.file_count("java"), 3);
    assert_eq!(collector.file_count("hbm.xml"), 2);
    assert!(!temp.path().join("org/shop/Address.hbm.xml").exists());

    let customer = fs::read_to_string(temp.path().join("org/shop/Customer.java")).unwrap();
    assert!(customer.starts_with("package org.shop;\n\n"));
    assert!(customer.contains(
        "import java.io.Serializable;\nimport java.util.HashSet;\nimport java.util.Set;\n"
    ));
    assert!(customer.contains("public class Customer implements Serializable {\n"));
    assert!(customer.contains("    private long id;\n"));
    assert!(customer.contains("    private Address address;\n"));
    assert!(customer.contains("    private Set<org.shop.Order> orders = new HashSet<>(0);\n"));
    assert!(customer.contains("    public Customer(String name) {\n"));
    assert!(customer.contains(
        "    public Customer(String name, Address address, Set<org.shop.Order> orders) {\n"
    ));

    let order = fs::read_to_string(temp.path().join("org/shop/Order.java")).unwrap();
    insta::assert_snapshot!(order, @r"
package org.shop;

import java.io.Serializable;

/**
 * Generated by pojogen
 */
public class Order implements Serializable {

    private long id;
    private Customer customer;

    public Order() {
    }

    public Order(Customer customer) {
        this.customer = customer;
    }

    public long getId() {
        return this.id;
    }

    public void setId(long id) {
        this.id = id;
    }

    public Customer getCustomer() {
        return this.customer;
    }

    public void setCustomer(Customer customer) {
        this.customer = customer;
    }
}
");

    let address = fs::read_to_string(temp.path().join("org/shop/Address.java")).unwrap();
    assert!(address.contains("public class Address implements Serializable {\n"));
    assert!(address.contains("    public Address(String city) {\n"));

    let mapping = fs::read_to_string(temp.path().join("org/shop/Customer.hbm.xml")).unwrap();
    insta::assert_snapshot!(mapping, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE hibernate-mapping PUBLIC "-//Hibernate/Hibernate Mapping DTD 3.0//EN"
  "http://www.hibernate.org/dtd/hibernate-mapping-3.0.dtd">
<hibernate-mapping>
  <class name="org.shop.Customer" entity-name="Customer" table="CUSTOMER">
    <id name="id" type="long">
      <generator class="native"/>
    </id>
    <property name="name" type="string" not-null="true"/>
    <component name="address" class="org.shop.Address">
      <property name="city" type="string"/>
    </component>
    <set name="orders" inverse="true">
      <key column="CUSTOMER_ID"/>
      <one-to-many class="org.shop.Order"/>
    </set>
  </class>
</hibernate-mapping>
"#);
}

#[test]
fn test_package_override_moves_sources_only() {
    let temp = TempDir::new().unwrap();
    let settings = Settings::new().set(keys::PACKAGE, "com.acme.model");
    let options = ExportOptions::from_settings(temp.path(), &settings).unwrap();

    let report = exporter()
        .run(&shop(), &options, &ArtifactCollector::new())
        .unwrap();

    assert_eq!(report.written.len(), 5);
    let customer =
        fs::read_to_string(temp.path().join("com/acme/model/Customer.java")).unwrap();
    assert!(customer.starts_with("package com.acme.model;\n"));
    assert!(customer.contains("    private Set orders = new HashSet(0);\n"));
    assert!(temp.path().join("org/shop/Customer.hbm.xml").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut options = ExportOptions::new(temp.path().join("out"));
    options.dry_run = true;
    let collector = ArtifactCollector::new();

    let report = exporter().run(&shop(), &options, &collector).unwrap();

    assert!(report.written.is_empty());
    assert_eq!(report.previews.len(), 5);
    assert_eq!(
        report.previews[0].relative_path(),
        PathBuf::from("org/shop/Customer.java")
    );
    assert!(report.previews[1].content().starts_with("<?xml"));
    assert!(collector.is_empty());
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_malformed_unit_is_skipped() {
    let temp = TempDir::new().unwrap();
    let metadata = parse_str(
        r#"
        [[class]]
        name = "org.shop.Good"
        [class.id]
        name = "id"
        type = "long"

        [[class]]
        name = "org.shop.Bad"
        [class.id]
        name = "id"
        type = "long"
        [[class.property]]
        name = "weird"
        type = "nonsense"
        "#,
    )
    .unwrap();

    let report = exporter()
        .run(&metadata, &ExportOptions::new(temp.path()), &ArtifactCollector::new())
        .unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].unit, "org.shop.Bad");
    assert_eq!(report.skipped[0].category, "java");
    assert!(report.skipped[0].reason.contains("unknown type 'nonsense'"));
    assert!(!temp.path().join("org/shop/Bad.java").exists());
}

#[test]
fn test_write_failures() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let lenient = exporter()
        .run(&shop(), &ExportOptions::new(&blocker), &ArtifactCollector::new())
        .unwrap();
    assert_eq!(lenient.failed.len(), 5);
    assert!(lenient.written.is_empty());

    let mut strict = ExportOptions::new(&blocker);
    strict.strict = true;
    let err = exporter()
        .run(&shop(), &strict, &ArtifactCollector::new())
        .unwrap_err();
    assert!(err.to_string().starts_with("failed to write '"));
}

#[test]
fn test_parallel_run_matches_sequential() {
    let metadata = shop();
    let sequential_dir = TempDir::new().unwrap();
    let parallel_dir = TempDir::new().unwrap();

    let sequential = exporter()
        .run(
            &metadata,
            &ExportOptions::new(sequential_dir.path()),
            &ArtifactCollector::new(),
        )
        .unwrap();
    let mut parallel_options = ExportOptions::new(parallel_dir.path());
    parallel_options.jobs = 4;
    let parallel = exporter()
        .run(&metadata, &parallel_options, &ArtifactCollector::new())
        .unwrap();

    let sequential_paths = relative(&sequential.written, &sequential_dir);
    assert_eq!(sequential_paths, relative(&parallel.written, &parallel_dir));
    for path in sequential_paths {
        assert_eq!(
            fs::read_to_string(sequential_dir.path().join(&path)).unwrap(),
            fs::read_to_string(parallel_dir.path().join(&path)).unwrap()
        );
    }
}
