use diodem::runtime_conf::parse_runtime_conf;
use diodem::{load_runtime_conf, Interpolation, RuntimeConf};

#[test]
fn missing_keys_fall_back_to_defaults() {
    let conf = parse_runtime_conf("dataset_path: /data/diodem\ninterpolation: linear\n").unwrap();

    assert_eq!(conf.dataset_path, "/data/diodem");
    assert_eq!(conf.interpolation, Interpolation::Linear);
    assert_eq!(conf.cache_path, RuntimeConf::default().cache_path);
    assert_eq!(conf.resample_hz, 100.0);
    assert!(conf.strict_crop);
}

#[test]
fn empty_document_is_the_default() {
    assert_eq!(parse_runtime_conf("").unwrap(), RuntimeConf::default());
    assert_eq!(parse_runtime_conf("  \n").unwrap(), RuntimeConf::default());
    assert_eq!(RuntimeConf::default().cache_path, "~/.diodem_cache");
}

#[test]
fn unknown_interpolation_is_a_yaml_error() {
    assert!(parse_runtime_conf("interpolation: quadratic").is_err());
}

#[test]
fn conf_is_read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diodem.yaml");
    std::fs::write(&path, "resample_hz: 60.0\nstrict_crop: false\n").unwrap();

    let conf = load_runtime_conf(&path).unwrap();
    assert_eq!(conf.resample_hz, 60.0);
    assert!(!conf.strict_crop);
    assert!(load_runtime_conf(&dir.path().join("missing.yaml")).is_err());
}
