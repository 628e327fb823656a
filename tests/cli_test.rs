use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tplgen::cli::Args;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("tplgen")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_no_args() {
    let parsed = Args::try_parse_from(make_args(&[])).unwrap();

    assert!(parsed.dir.is_none());
    assert!(parsed.template.is_none());
    assert!(parsed.variables.is_none());
    assert!(parsed.output.is_none());
    assert!(parsed.varfiles.is_empty());
    assert!(!parsed.quickstart);
    assert!(!parsed.yes);
    assert!(!parsed.verbose);
}

#[test]
fn test_directory_flags() {
    let args = make_args(&[
        "--dir",
        "/work",
        "--template",
        "tpl",
        "--variables",
        "vars",
        "--output",
        "out",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.dir, Some(PathBuf::from("/work")));
    assert_eq!(parsed.template, Some(PathBuf::from("tpl")));
    assert_eq!(parsed.variables, Some(PathBuf::from("vars")));
    assert_eq!(parsed.output, Some(PathBuf::from("out")));
}

#[test]
fn test_comma_separated_lists() {
    let args = make_args(&[
        "--varfiles",
        "a.yaml,b.yaml",
        "--skip-suffixes",
        ".bak,.orig",
        "--skip-prefixes",
        "drafts/",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(
        parsed.varfiles,
        vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
    );
    assert_eq!(parsed.skip_suffixes, vec![".bak", ".orig"]);
    assert_eq!(parsed.skip_prefixes, vec!["drafts/"]);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-d", "/work", "-t", "tpl", "-o", "out", "-y", "-v"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.dir, Some(PathBuf::from("/work")));
    assert_eq!(parsed.template, Some(PathBuf::from("tpl")));
    assert_eq!(parsed.output, Some(PathBuf::from("out")));
    assert!(parsed.yes);
    assert!(parsed.verbose);
}

#[test]
fn test_quickstart_flag() {
    let args = make_args(&["--quickstart", "--yes"]);
    let parsed = Args::try_parse_from(args).unwrap();
    assert!(parsed.quickstart);
    assert!(parsed.yes);
}

#[test]
fn test_unexpected_positional() {
    assert!(Args::try_parse_from(make_args(&["extra"])).is_err());
}
