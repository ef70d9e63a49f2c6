use clap::Parser;
use drive_mover::cli::Args;
use drive_mover::config::types::{Config, LogLevel, MoveStrategy, SkipPolicy};

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["drive_mover", "--debug", "--log-level", "quiet"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug)); // --debug wins

    let args = Args::parse_from(["drive_mover", "--log-level", "info"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::parse_from(["drive_mover"]);
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn apply_overrides_sets_flags() {
    let args = Args::parse_from([
        "drive_mover",
        "--target-folder",
        " 1cfT2p9GyexmIIFVwR4HmWpdaCzg2GYsX ",
        "--name-contains",
        "Weekly Report",
        "--name-excludes",
        "",
        "--page-size",
        "250",
        "--skip-policy",
        "contains",
        "--move-strategy",
        "two-step",
        "--dry-run",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.target_folder_id, "1cfT2p9GyexmIIFVwR4HmWpdaCzg2GYsX");
    assert_eq!(cfg.name_contains, "Weekly Report");
    assert_eq!(cfg.name_excludes, "");
    assert_eq!(cfg.page_size, 250);
    assert_eq!(cfg.skip_policy, SkipPolicy::Contains);
    assert_eq!(cfg.move_strategy, MoveStrategy::TwoStep);
    assert!(cfg.dry_run);

    let query = cfg.query();
    assert!(query.name_excludes.is_none());
}

#[test]
fn unset_flags_keep_config_values() {
    let mut cfg = Config::new("FROM_XML");
    cfg.page_size = 42;
    cfg.skip_policy = SkipPolicy::Contains;
    Args::parse_from(["drive_mover"]).apply_overrides(&mut cfg);
    assert_eq!(cfg.target_folder_id, "FROM_XML");
    assert_eq!(cfg.page_size, 42);
    assert_eq!(cfg.skip_policy, SkipPolicy::Contains);
    assert!(!cfg.dry_run);
}

#[test]
fn invalid_policy_is_rejected_by_parser() {
    let res = Args::try_parse_from(["drive_mover", "--skip-policy", "sometimes"]);
    assert!(res.is_err());
}
