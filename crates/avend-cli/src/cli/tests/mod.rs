//! CLI parse and dispatch tests.

use super::commands::{exit_status, run_sync};
use super::{load_manifest, Cli, CliCommand};
use avend_core::config::AvendConfig;
use avend_core::engine::RunSummary;
use avend_core::manifest::Manifest;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_no_args_runs_sync() {
    let cli = parse(&["avend"]);
    assert!(cli.command.is_none());
    assert!(!cli.opts.strict);
    assert!(cli.opts.jobs.is_none());
}

#[test]
fn cli_parse_sync_with_overrides() {
    let cli = parse(&[
        "avend",
        "sync",
        "--root",
        "src/app/static/vendor",
        "-j",
        "4",
        "--timeout",
        "10",
        "--strict",
    ]);
    assert!(matches!(cli.command, Some(CliCommand::Sync)));
    assert_eq!(cli.opts.root.as_deref(), Some(Path::new("src/app/static/vendor")));
    assert_eq!(cli.opts.jobs, Some(4));
    assert_eq!(cli.opts.timeout, Some(10));
    assert!(cli.opts.strict);
}

#[test]
fn cli_parse_global_flags_before_subcommand() {
    let cli = parse(&["avend", "--manifest", "assets.toml", "list"]);
    assert!(matches!(cli.command, Some(CliCommand::List)));
    assert_eq!(cli.opts.manifest.as_deref(), Some(Path::new("assets.toml")));
}

#[test]
fn cli_parse_manifest() {
    assert!(matches!(parse(&["avend", "manifest"]).command, Some(CliCommand::Manifest)));
}

#[test]
fn cli_parse_checksum() {
    match parse(&["avend", "checksum", "/path/to/file.bin"]).command {
        Some(CliCommand::Checksum { path }) => assert_eq!(path, "/path/to/file.bin"),
        other => panic!("expected Checksum, got {:?}", other),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["avend", "install"]).is_err());
}

#[test]
fn overrides_apply_on_top_of_config() {
    let cli = parse(&["avend", "--root", "out", "--jobs", "3", "--strict"]);
    let mut cfg = AvendConfig {
        timeout_secs: 12,
        ..AvendConfig::default()
    };
    cli.opts.apply(&mut cfg);
    assert_eq!(cfg.vendor_root, PathBuf::from("out"));
    assert_eq!(cfg.jobs, 3);
    assert_eq!(cfg.timeout_secs, 12);
    assert!(cfg.strict);
}

#[test]
fn strict_flag_never_disables_config_strict() {
    let cli = parse(&["avend"]);
    let mut cfg = AvendConfig {
        strict: true,
        ..AvendConfig::default()
    };
    cli.opts.apply(&mut cfg);
    assert!(cfg.strict);
}

#[test]
fn load_with_explicit_config_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("assets.toml");
    std::fs::write(
        &manifest,
        "[[library]]\nname = \"lib\"\n[[library.asset]]\nurl = \"https://example.test/a.css\"\npath = \"a.css\"\n",
    )
    .unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, format!("manifest = {:?}\njobs = 2\n", manifest)).unwrap();

    let cli = parse(&["avend", "--config", config.to_str().unwrap()]);
    let (cfg, m) = cli.opts.load().unwrap();
    assert_eq!(cfg.jobs, 2);
    assert_eq!(m.libraries.len(), 1);
    assert_eq!(m.libraries[0].name, "lib");
}

#[test]
fn builtin_manifest_used_without_manifest_setting() {
    let m = load_manifest(&AvendConfig::default()).unwrap();
    assert!(m.libraries.iter().any(|l| l.name == "leaflet"));
}

#[test]
fn missing_manifest_file_is_an_error() {
    let cfg = AvendConfig {
        manifest: Some(PathBuf::from("/nonexistent/assets.toml")),
        ..AvendConfig::default()
    };
    let err = load_manifest(&cfg).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/assets.toml"));
}

#[test]
fn failures_are_advisory_unless_strict() {
    let failed = RunSummary {
        fetched: 3,
        skipped: 1,
        failed: 1,
    };
    let clean = RunSummary {
        fetched: 3,
        skipped: 1,
        failed: 0,
    };
    assert_eq!(exit_status(&failed, false), 0);
    assert_eq!(exit_status(&failed, true), 2);
    assert_eq!(exit_status(&clean, true), 0);
}

/// URL on a local port with nothing listening, so the GET fails fast.
fn refused_url(path: &str) -> String {
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    format!("http://127.0.0.1:{}/{}", port, path)
}

/// One asset already on disk and one that cannot be fetched.
fn half_broken_setup(root: &Path) -> Manifest {
    std::fs::create_dir_all(root.join("lib")).unwrap();
    std::fs::write(root.join("lib").join("present.css"), b"body{}").unwrap();
    Manifest::from_toml_str(&format!(
        "[[library]]\nname = \"lib\"\n\
         [[library.asset]]\nurl = \"{}\"\npath = \"present.css\"\n\
         [[library.asset]]\nurl = \"{}\"\npath = \"missing.js\"\n",
        refused_url("present.css"),
        refused_url("missing.js"),
    ))
    .unwrap()
}

fn sync_config(root: &Path, strict: bool) -> AvendConfig {
    AvendConfig {
        vendor_root: root.to_path_buf(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
        strict,
        ..AvendConfig::default()
    }
}

#[tokio::test]
async fn sync_with_failed_asset_still_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("vendor");
    let manifest = half_broken_setup(&root);

    let code = run_sync(&sync_config(&root, false), &manifest, false).await.unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(std::fs::read(root.join("lib/present.css")).unwrap(), b"body{}");
    assert!(!root.join("lib/missing.js").exists());
    assert!(!root.join("lib/missing.js.part").exists());
}

#[tokio::test]
async fn strict_sync_with_failed_asset_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("vendor");
    let manifest = half_broken_setup(&root);

    let code = run_sync(&sync_config(&root, true), &manifest, true).await.unwrap();

    assert_eq!(code, ExitCode::from(2));
}

#[tokio::test]
async fn sync_creates_missing_vendor_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a").join("b").join("vendor");
    let manifest = Manifest::from_toml_str(&format!(
        "[[library]]\nname = \"lib\"\n[[library.asset]]\nurl = \"{}\"\npath = \"a.css\"\n",
        refused_url("a.css")
    ))
    .unwrap();

    let code = run_sync(&sync_config(&root, false), &manifest, false).await.unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(root.join("lib").is_dir());
}
