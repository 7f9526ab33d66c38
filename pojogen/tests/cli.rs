use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

const MAPPING: &str = r#"
[[class]]
name = "org.library.Book"
entity-name = "Book"
meta = { class-description = "A book on the shelf." }

[class.id]
name = "isbn"
type = "string"

[[class.property]]
name = "title"
type = "string"
not-null = true

[[class.property]]
name = "pages"
type = "integer"
"#;

const TABLES: &str = r#"
[[selection]]
schema = "LIB"

[[table]]
schema = "LIB"
name = "SHELF"
primary-key = ["ID"]

[[table.column]]
name = "ID"
sql-type = "BIGINT"
nullable = false

[[table]]
schema = "LIB"
name = "BOOK"
primary-key = ["ISBN"]

[[table.column]]
name = "ISBN"
sql-type = "VARCHAR(13)"
nullable = false

[[table.column]]
name = "SHELF_ID"
sql-type = "BIGINT"

[[table.foreign-key]]
columns = ["SHELF_ID"]
references = { schema = "LIB", name = "SHELF" }
"#;

fn pojogen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pojogen"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_generate_writes_sources() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("mapping.toml"), MAPPING).unwrap();

    let output = pojogen(temp.path(), &["generate", "--output", "out", "--hbm"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("mapping.toml: 1 entities"));
    assert!(stdout.contains("  java: 1 files"));
    assert!(stdout.contains("  hbm.xml: 1 files"));

    let book = fs::read_to_string(temp.path().join("out/org/library/Book.java")).unwrap();
    assert!(book.contains(" * A book on the shelf.\n"));
    assert!(book.contains("    public Book(String isbn, String title) {\n"));
    assert!(book.contains("    public Book(String isbn, String title, Integer pages) {\n"));
    assert!(temp.path().join("out/org/library/Book.hbm.xml").exists());
}

#[test]
fn test_generate_dry_run_with_package() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("mapping.toml"), MAPPING).unwrap();

    let output = pojogen(
        temp.path(),
        &["generate", "--output", "out", "--dry-run", "--package", "com.acme"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("── com/acme/Book.java ──"));
    assert!(stdout.contains("package com.acme;"));
    assert!(stdout.contains("1 files would be generated"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_settings_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("mapping.toml"), MAPPING).unwrap();
    fs::write(
        temp.path().join("pojogen.toml"),
        "package = \"org.shelf\"\n\n[doc]\nfallback = \"Generated class\"\n",
    )
    .unwrap();

    let output = pojogen(
        temp.path(),
        &["generate", "--settings", "pojogen.toml", "--output", "out"],
    );

    assert!(output.status.success());
    assert!(temp.path().join("out/org/shelf/Book.java").exists());
}

#[test]
fn test_check_valid_and_invalid() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("mapping.toml"), MAPPING).unwrap();

    let output = pojogen(temp.path(), &["check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("✓ mapping.toml is valid"));
    assert!(stdout.contains("  entities: 1"));

    fs::write(
        temp.path().join("broken.toml"),
        "[[class]]\nname = \"Broken\"\n[class.id]\nname = \"id\"\ntype = \"nonsense\"\n",
    )
    .unwrap();
    let output = pojogen(temp.path(), &["check", "--mapping", "broken.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown type 'nonsense'"));
}

#[test]
fn test_check_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("mapping.toml"),
        "[[class]]\nname = \"NoId\"\n",
    )
    .unwrap();

    let output = pojogen(temp.path(), &["check"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("root entity 'NoId' has no identifier property"));
}

#[test]
fn test_reveng_generates_associations() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tables.toml"), TABLES).unwrap();

    let output = pojogen(
        temp.path(),
        &["reveng", "--output", "out", "--package", "org.lib", "--jdk5"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Tables (2):"));
    assert!(stdout.contains("  - LIB.SHELF -> org.lib.Shelf"));
    assert!(stdout.contains("  - LIB.BOOK -> org.lib.Book"));

    let book = fs::read_to_string(temp.path().join("out/org/lib/Book.java")).unwrap();
    assert!(book.contains("    private Shelf shelf;\n"));
    let shelf = fs::read_to_string(temp.path().join("out/org/lib/Shelf.java")).unwrap();
    assert!(shelf.contains("    private Set<org.lib.Book> books = new HashSet<>(0);\n"));
}
