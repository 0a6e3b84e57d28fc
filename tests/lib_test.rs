//! Library integration tests.

use sherpa::SherpaError;

#[test]
fn error_types_are_public() {
    let err = SherpaError::UnknownTool {
        tool: "test".into(),
    };
    assert!(err.to_string().contains("test"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> sherpa::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use sherpa::cli::{Cli, Commands};

    let cli = Cli::parse_from(["sherpa", "list", "--json"]);
    if let Commands::List(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected List command");
    }
}

#[test]
fn builtin_catalog_and_registry_compose() {
    use sherpa::catalog::Catalog;
    use sherpa::engine::Engine;
    use sherpa::handlers::HandlerRegistry;

    let catalog = Catalog::builtin().unwrap();
    let registry = HandlerRegistry::builtin();
    assert!(Engine::new(&catalog, &registry).is_ok());
}

#[test]
fn presets_are_public() {
    use sherpa::profile::presets;

    for name in presets::NAMES {
        assert!(presets::by_name(name).is_some());
    }
}
