use std::fs;

use inkpost_engine::{ensure_state_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("prefs.ron", "(theme: Light)").unwrap();
    assert_eq!(first.file_name().unwrap(), "prefs.ron");
    assert_eq!(fs::read_to_string(&first).unwrap(), "(theme: Light)");

    let second = writer.write("prefs.ron", "(theme: Dark)").unwrap();
    assert_eq!(first, second);
    assert_eq!(writer.read("prefs.ron").unwrap().as_deref(), Some("(theme: Dark)"));
}

#[test]
fn missing_file_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    assert_eq!(writer.read("prefs.ron").unwrap(), None);
}

#[test]
fn file_in_place_of_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("prefs.ron", "data").is_err());
    assert!(!file_path.with_file_name("prefs.ron").exists());
}
