use hangar_core::inventory;
use tempfile::TempDir;

#[test]
fn flags_model_folders_without_weights() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("models");

    let marian = root.join("marian-en-de");
    std::fs::create_dir_all(&marian).unwrap();
    std::fs::write(marian.join("model.safetensors"), b"abcd").unwrap();
    std::fs::write(marian.join("vocab.json"), b"{}").unwrap();

    let broken = root.join("broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("README.md"), b"# empty\n").unwrap();

    let report = inventory::scan(&root).unwrap();
    assert_eq!(report.models.len(), 2);
    assert!(!report.healthy());

    // Entries come back sorted by directory name.
    assert_eq!(report.models[0].name, "broken");
    assert!(!report.models[0].has_weights);
    assert_eq!(report.models[0].files, 1);

    assert_eq!(report.models[1].name, "marian-en-de");
    assert!(report.models[1].has_weights);
    assert!(report.models[1].has_tokenizer);
    assert_eq!(report.models[1].files, 2);
    assert_eq!(report.models[1].total_bytes, 6);
}

#[test]
fn empty_or_missing_root_is_healthy() {
    let tmp = TempDir::new().unwrap();
    let report = inventory::scan(tmp.path()).unwrap();
    assert!(report.models.is_empty());
    assert!(report.healthy());

    let report = inventory::scan(&tmp.path().join("absent")).unwrap();
    assert!(report.models.is_empty());
}
