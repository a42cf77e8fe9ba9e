use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use objmap_cli::cli::Cli;
use objmap_cli::commands::{emit, run_suggest};
use objmap_cli::logging::LogFormat;
use objmap_cli::summary::summary_table;
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

const SOURCE_JAVA: &str = r#"package com.example.models;

public class Person {
    private String firstName;
    private String lastName;
    private int age;
    private String nickname;
}
"#;

const TARGET_JAVA: &str = r#"package com.example.dto;

public class PersonDto {
    private String firstname;
    private String lastName;
    private int ages;
}
"#;

fn write_pair(dir: &TempDir) -> (PathBuf, PathBuf) {
    let source = dir.path().join("Person.java");
    let target = dir.path().join("PersonDto.java");
    fs::write(&source, SOURCE_JAVA).expect("write source");
    fs::write(&target, TARGET_JAVA).expect("write target");
    (source, target)
}

#[test]
fn requires_two_paths() {
    assert!(Cli::try_parse_from(["objmap-suggest"]).is_err());
    assert!(Cli::try_parse_from(["objmap-suggest", "A.java"]).is_err());
    assert!(Cli::try_parse_from(["objmap-suggest", "A.java", "B.java", "C.java"]).is_err());
}

#[test]
fn explicit_log_level_disables_env_filter() {
    let cli = Cli::try_parse_from([
        "objmap-suggest",
        "A.java",
        "B.java",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("parse");
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::DEBUG);
    assert!(!config.use_env_filter);
    assert_eq!(config.format, LogFormat::Json);
}

#[test]
fn defaults_honour_env_filter() {
    let cli = Cli::try_parse_from(["objmap-suggest", "A.java", "B.java"]).expect("parse");
    let config = cli.log_config();
    assert!(config.use_env_filter);
    assert_eq!(config.level_filter, LevelFilter::WARN);
    assert!(!cli.yes);
}

#[test]
fn verbose_flag_raises_level() {
    let cli = Cli::try_parse_from(["objmap-suggest", "-vv", "A.java", "B.java"]).expect("parse");
    let config = cli.log_config();
    assert_eq!(config.level_filter, LevelFilter::DEBUG);
    assert!(!config.use_env_filter);
}

#[test]
fn accept_all_run_emits_fragment() {
    let dir = TempDir::new().expect("tempdir");
    let (source, target) = write_pair(&dir);
    let cli = Cli::try_parse_from([
        OsStr::new("objmap-suggest"),
        source.as_os_str(),
        target.as_os_str(),
        OsStr::new("--yes"),
    ])
    .expect("parse");

    let suggestion = run_suggest(&cli).expect("suggest");
    assert_eq!(suggestion.accepted.len(), 3);
    assert!(suggestion.rejected.is_empty());
    assert_eq!(suggestion.unmatched.len(), 1);
    assert_eq!(suggestion.unmatched[0].name, "nickname");

    let mut out = Vec::new();
    emit(&suggestion, &mut out).expect("emit");
    let json: serde_json::Value = serde_json::from_slice(&out).expect("stdout is json");
    insta::assert_json_snapshot!(json, @r#"
    {
      "fields": {
        "age": "ages",
        "firstName": "firstname",
        "lastName": "lastName"
      },
      "sourceClass": "com.example.models.Person",
      "targetClass": "com.example.dto.PersonDto"
    }
    "#);
}

#[test]
fn missing_file_reports_context() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("Missing.java");
    let cli = Cli::try_parse_from([
        OsStr::new("objmap-suggest"),
        missing.as_os_str(),
        missing.as_os_str(),
        OsStr::new("-y"),
    ])
    .expect("parse");

    let error = run_suggest(&cli).expect_err("missing file");
    let message = format!("{error:#}");
    assert!(message.starts_with("suggest mapping from"), "{message}");
    assert!(message.contains("Missing.java"), "{message}");
}

#[test]
fn summary_lists_every_source_field() {
    let dir = TempDir::new().expect("tempdir");
    let (source, target) = write_pair(&dir);
    let cli = Cli::try_parse_from([
        OsStr::new("objmap-suggest"),
        source.as_os_str(),
        target.as_os_str(),
        OsStr::new("--yes"),
    ])
    .expect("parse");
    let suggestion = run_suggest(&cli).expect("suggest");

    let rendered = summary_table(&suggestion).to_string();
    for name in ["firstName", "lastName", "age", "nickname"] {
        assert!(rendered.contains(name), "{name} missing from:\n{rendered}");
    }
    assert!(rendered.contains("accepted"));
    assert!(rendered.contains("no match"));
    assert!(rendered.contains("exact"));
    assert!(rendered.contains("distance 1"));
}
