//! Layered handler matching.
//!
//! Walks the registry tables from most to least specific and returns the
//! first pattern hit. A pure lookup over the captured text: matching the
//! same output against the same registry twice yields the same handler.

use regex::Regex;

use crate::catalog::MethodSpec;

use super::{Category, HandlerEntry, HandlerRegistry, Layer, OptionContext, RemediationOption};

/// A pattern hit with its concrete options.
#[derive(Debug, Clone)]
pub struct MatchedHandler {
    pub name: &'static str,
    pub layer: Layer,
    pub category: Category,
    pub options: Vec<RemediationOption>,
}

/// Match captured output against the registry for one tool and method.
///
/// Layer order: tool-specific, then the method's ecosystem table, then
/// its native-family table, then infra. Returns `None` only when no
/// layer matches; the infra table is built to make that unreachable for
/// the canonical infrastructure failure classes.
pub fn match_output(
    registry: &HandlerRegistry,
    output: &str,
    spec: &MethodSpec,
    tool: &str,
    command: &str,
) -> Option<MatchedHandler> {
    let ctx = OptionContext { tool, command };

    let mut layers: Vec<(Layer, &[HandlerEntry])> = Vec::with_capacity(4);
    layers.push((Layer::ToolSpecific, registry.tool(tool)));
    if let Some(tag) = spec.eco_tag() {
        layers.push((Layer::EcosystemFamily, registry.ecosystem(tag)));
    }
    if let Some(tag) = spec.family_tag() {
        layers.push((Layer::MethodFamily, registry.family(tag)));
    }
    layers.push((Layer::Infra, registry.infra()));

    for (layer, table) in layers {
        for entry in table {
            let Ok(regex) = Regex::new(entry.pattern) else {
                continue;
            };
            if let Some(caps) = regex.captures(output) {
                let options = (entry.options)(&caps, &ctx);
                // Empty options mean the captures lacked what the builder
                // needed; fall through to the next entry.
                if options.is_empty() {
                    continue;
                }
                return Some(MatchedHandler {
                    name: entry.name,
                    layer,
                    category: entry.category,
                    options,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Strategy;

    fn method(yaml: &str) -> MethodSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn apk_method() -> MethodSpec {
        method(
            r#"
kind: native
pm: apk
package: ripgrep
command: "apk add {package}"
"#,
        )
    }

    fn cargo_method() -> MethodSpec {
        method(
            r#"
kind: manager
manager: cargo
package: ripgrep
command: "cargo install {package}"
"#,
        )
    }

    #[test]
    fn family_layer_matches_apk_output() {
        let registry = HandlerRegistry::builtin();
        let spec = apk_method();
        let hit = match_output(
            &registry,
            "ERROR: unable to select packages:\n  ripgrep (no such package)",
            &spec,
            "ripgrep",
            "apk add ripgrep",
        )
        .unwrap();
        assert_eq!(hit.layer, Layer::MethodFamily);
        assert_eq!(hit.name, "apk_package_not_found");
    }

    #[test]
    fn read_only_fs_falls_through_to_infra() {
        // The worked example: apk family, no tool-specific handler, and
        // read-only filesystem text must land on the infra handler.
        let registry = HandlerRegistry::builtin();
        let spec = apk_method();
        let hit = match_output(
            &registry,
            "ERROR: read-only file system",
            &spec,
            "some-tool-without-handlers",
            "apk add some-tool",
        )
        .unwrap();
        assert_eq!(hit.layer, Layer::Infra);
        assert_eq!(hit.name, "read_only_rootfs");
    }

    #[test]
    fn ecosystem_layer_matches_cargo_output() {
        let registry = HandlerRegistry::builtin();
        let spec = cargo_method();
        let hit = match_output(
            &registry,
            "error: linker `cc` not found",
            &spec,
            "ripgrep",
            "cargo install ripgrep",
        )
        .unwrap();
        assert_eq!(hit.layer, Layer::EcosystemFamily);
        assert!(matches!(
            &hit.options[0].strategy,
            Strategy::InstallDependency { tool } if tool == "build-tools"
        ));
    }

    #[test]
    fn tool_layer_beats_infra_for_fzf() {
        let registry = HandlerRegistry::builtin();
        let spec = method(
            r#"
kind: script
url: "https://example.com/install"
command: "git clone --depth 1 https://github.com/junegunn/fzf.git ~/.fzf"
"#,
        );
        let hit = match_output(
            &registry,
            "fatal: destination path '/home/user/.fzf' already exists",
            &spec,
            "fzf",
            "git clone --depth 1 https://github.com/junegunn/fzf.git ~/.fzf",
        )
        .unwrap();
        assert_eq!(hit.layer, Layer::ToolSpecific);
    }

    #[test]
    fn infra_catch_all_for_canonical_failures() {
        // Property: the nine canonical infra texts match even for a tool
        // with no specific handlers and a method with no family tables.
        let registry = HandlerRegistry::builtin();
        let spec = cargo_method();
        let failures = [
            "curl: (6) Could not resolve host: github.com",
            "HTTP 403 Forbidden: blocked by corporate proxy",
            "tar: write error: No space left on device",
            "touch: /usr/bin/probe: Read-only file system",
            "sh: sudo: not found",
            "sudo: 3 incorrect password attempts",
            "open(/usr/local/bin): Permission denied",
            "fatal error: Killed signal terminated program cc1plus: out of memory",
            "command timed out after 120s",
        ];
        for failure in failures {
            let hit = match_output(&registry, failure, &spec, "nobody-tool", "true");
            assert!(hit.is_some(), "no handler for canonical failure: {}", failure);
        }
    }

    #[test]
    fn unrecognized_output_is_no_match() {
        let registry = HandlerRegistry::builtin();
        let spec = apk_method();
        let hit = match_output(
            &registry,
            "something nobody has ever seen before",
            &spec,
            "ripgrep",
            "apk add ripgrep",
        );
        assert!(hit.is_none());
    }

    #[test]
    fn matching_is_idempotent() {
        let registry = HandlerRegistry::builtin();
        let spec = apk_method();
        let output = "ERROR: unable to select packages:\n  ripgrep (no such package)";
        let first = match_output(&registry, output, &spec, "ripgrep", "apk add ripgrep").unwrap();
        let second = match_output(&registry, output, &spec, "ripgrep", "apk add ripgrep").unwrap();
        assert_eq!(first.name, second.name);
        assert_eq!(first.options, second.options);
    }

    #[test]
    fn specific_family_beats_generic_infra() {
        // Output containing both a family-specific and an infra pattern
        // resolves at the more specific layer.
        let registry = HandlerRegistry::builtin();
        let spec = apk_method();
        let output = "ERROR: no such package ripgrep\nwget: permission denied";
        let hit = match_output(&registry, output, &spec, "ripgrep", "apk add ripgrep").unwrap();
        assert_eq!(hit.layer, Layer::MethodFamily);
    }
}
