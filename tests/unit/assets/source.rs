use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "carfit_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/parts/x.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn fs_source_reads_relative_to_root() {
    let tmp = temp_dir("fs_source");
    std::fs::create_dir_all(tmp.join("parts")).unwrap();
    std::fs::write(tmp.join("parts/w.png"), b"bytes").unwrap();

    let source = FsAssetSource::new(&tmp);
    assert_eq!(source.root(), tmp.as_path());
    assert_eq!(source.read_bytes("parts\\w.png").unwrap(), b"bytes");
    assert!(source.read_bytes("parts/missing.png").is_err());
    assert!(source.read_bytes("../escape.png").is_err());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn memory_source_normalizes_keys() {
    let source = MemorySource::new()
        .with("parts\\roof/box.png", vec![1, 2, 3])
        .unwrap();
    assert_eq!(source.read_bytes("parts/roof/box.png").unwrap(), vec![1, 2, 3]);
    assert!(matches!(
        source.read_bytes("parts/roof/rack.png"),
        Err(CarfitError::Asset(_))
    ));
}
