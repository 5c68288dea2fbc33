// tests/lookup.rs

use std::fs;

use tempfile::TempDir;

use gowatch::lookup::find_entry_file;

#[test]
fn finds_the_entry_file_in_a_nested_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("cmd/server")).unwrap();
    fs::write(dir.path().join("cmd/server/main.go"), "package main\n").unwrap();
    fs::write(dir.path().join("README.md"), "readme\n").unwrap();

    let found = find_entry_file(dir.path())
        .unwrap()
        .expect("entry file should be found");
    assert!(found.ends_with("cmd/server/main.go"));
}

#[test]
fn returns_none_when_the_tree_has_no_entry_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("pkg/util")).unwrap();
    fs::write(dir.path().join("pkg/util/util.go"), "package util\n").unwrap();

    assert!(find_entry_file(dir.path()).unwrap().is_none());
}

#[test]
fn ignores_a_directory_named_like_the_entry_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("main.go")).unwrap();
    fs::create_dir_all(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/main.go"), "package main\n").unwrap();

    let found = find_entry_file(dir.path())
        .unwrap()
        .expect("the real file should be found");
    assert!(found.is_file());
    assert!(found.ends_with("pkg/main.go"));
}
