use drive_mover::config::{load_or_init, LoadResult, ACCESS_TOKEN_ENV, CONFIG_ENV};
use drive_mover::{default_config_path, default_log_path, Config};
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[test]
#[serial]
fn env_override_directory_appends_config_xml_and_colocates_log() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &base);
    }

    let cfg_path = default_config_path().expect("default_config_path");
    assert!(cfg_path.ends_with("config.xml"), "got {}", cfg_path.display());
    assert_eq!(cfg_path.parent().unwrap(), base.as_path());

    let log_path = default_log_path().expect("default_log_path");
    assert_eq!(log_path.parent().unwrap(), base.as_path());

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}

#[test]
#[serial]
fn env_override_to_missing_file_uses_defaults_without_template() {
    let td = tempdir().unwrap();
    let missing = td.path().join("nope.xml");

    unsafe {
        std::env::set_var(CONFIG_ENV, &missing);
    }
    let res = load_or_init().expect("load_or_init");
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    assert!(matches!(res, LoadResult::Defaults));
    assert!(!missing.exists(), "no template should be written for an explicit override");
}

#[test]
#[serial]
fn env_override_file_is_loaded() {
    let td = tempdir().unwrap();
    let path = td.path().join("custom.xml");
    fs::write(&path, "<config><target_folder_id>XYZ</target_folder_id></config>").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &path);
    }
    let res = load_or_init().expect("load_or_init");
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    match res {
        LoadResult::Loaded { config, path: loaded } => {
            assert_eq!(config.target_folder_id, "XYZ");
            assert_eq!(loaded, path);
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[test]
#[serial]
fn access_token_env_wins_over_file() {
    let td = tempdir().unwrap();
    let token_file = td.path().join("token");
    fs::write(&token_file, "from-file\n").unwrap();
    let mut cfg = Config::new("F");
    cfg.access_token_file = Some(token_file);

    unsafe {
        std::env::remove_var(ACCESS_TOKEN_ENV);
    }
    assert_eq!(cfg.access_token().unwrap(), "from-file");

    unsafe {
        std::env::set_var(ACCESS_TOKEN_ENV, " from-env ");
    }
    let tok = cfg.access_token();
    unsafe {
        std::env::remove_var(ACCESS_TOKEN_ENV);
    }
    assert_eq!(tok.unwrap(), "from-env");

    cfg.access_token_file = None;
    assert!(cfg.access_token().is_err());
}
