use bake::cli::{Args, Command, RootArgs};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("bake")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_init_defaults() {
    let parsed = Args::try_parse_from(make_args(&["init"])).unwrap();

    assert!(!parsed.debug);
    assert_eq!(
        parsed.command,
        Command::Init { template: "default".to_string(), force: false, roots: RootArgs::default() }
    );
}

#[test]
fn test_init_all_flags() {
    let args = make_args(&["--debug", "init", "node", "--force", "-t", "/a", "--templates", "/b"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.debug);
    match parsed.command {
        Command::Init { template, force, roots } => {
            assert_eq!(template, "node");
            assert!(force);
            assert_eq!(roots.templates, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        }
        other => panic!("Expected init, got {other:?}"),
    }
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["init", "node", "-f", "-d"])).unwrap();

    assert!(parsed.debug);
    assert!(matches!(parsed.command, Command::Init { force: true, .. }));
}

#[test]
fn test_list() {
    let parsed = Args::try_parse_from(make_args(&["list"])).unwrap();
    assert_eq!(parsed.command, Command::List { roots: RootArgs::default() });
}

#[test]
fn test_missing_subcommand() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Args::try_parse_from(make_args(&["init", "node", "extra"])).is_err());
}
