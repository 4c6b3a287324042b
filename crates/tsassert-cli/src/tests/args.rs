use clap::Parser;

use super::{CliArgs, Commands, Flavor};

#[test]
fn parses_transform_with_defaults() {
    let args = CliArgs::try_parse_from(["tsassert", "transform", "mod.ts"]).expect("should parse");

    assert!(args.project.is_none());
    match args.command {
        Commands::Transform { file, flavor } => {
            assert_eq!(file.to_str(), Some("mod.ts"));
            assert_eq!(flavor, Flavor::Ts);
        }
        Commands::Analyze { .. } => panic!("expected transform"),
    }
}

#[test]
fn parses_analyze_with_project_flag() {
    let args = CliArgs::try_parse_from(["tsassert", "--project", "tsassert.json", "analyze", "mod.ts"]).expect("should parse");

    assert_eq!(args.project.as_deref(), Some(std::path::Path::new("tsassert.json")));
    assert!(matches!(args.command, Commands::Analyze { .. }));
}

#[test]
fn parses_explicit_js_flavor() {
    let args = CliArgs::try_parse_from(["tsassert", "transform", "mod.js", "--flavor", "js"]).expect("should parse");

    match args.command {
        Commands::Transform { flavor, .. } => assert_eq!(flavor, Flavor::Js),
        Commands::Analyze { .. } => panic!("expected transform"),
    }
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(CliArgs::try_parse_from(["tsassert", "bogus", "mod.ts"]).is_err());
}
