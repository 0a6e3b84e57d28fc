//! Recipe catalog: loading, lookup, and validation.
//!
//! Built-in recipes ship as YAML files under `recipes/`, embedded at
//! compile time. The catalog is loaded and validated once at startup and
//! is read-only for the rest of the run.

mod recipe;
mod template;
mod validator;

pub use recipe::{EcoTag, FamilyTag, MethodKind, MethodSpec, Recipe, Requires};
pub use template::{elevate, install_command, prerequisite_command, render_command};
pub use validator::validate_references;

use include_dir::{include_dir, Dir};
use std::collections::BTreeMap;

use crate::error::{Result, SherpaError};

static RECIPES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/recipes");

/// All known recipes, keyed by tool id.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: BTreeMap<String, Recipe>,
}

impl Catalog {
    /// Load and validate the embedded recipe catalog.
    pub fn builtin() -> Result<Self> {
        let docs: Vec<(&str, &str)> = RECIPES
            .files()
            .filter(|f| {
                f.path()
                    .extension()
                    .is_some_and(|ext| ext == "yml" || ext == "yaml")
            })
            .map(|f| {
                let name = f
                    .path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("recipe");
                let contents = std::str::from_utf8(f.contents()).unwrap_or("");
                (name, contents)
            })
            .collect();
        Self::from_yaml(&docs)
    }

    /// Parse recipes from `(name, yaml)` documents and validate the result.
    pub fn from_yaml(docs: &[(&str, &str)]) -> Result<Self> {
        let catalog = Self::parse(docs)?;
        validator::validate(&catalog)?;
        Ok(catalog)
    }

    /// Parse without validating. Only the validator's own tests need the
    /// unvalidated form.
    pub(crate) fn parse(docs: &[(&str, &str)]) -> Result<Self> {
        let mut recipes = BTreeMap::new();
        for (name, contents) in docs {
            let recipe: Recipe =
                serde_yaml::from_str(contents).map_err(|e| SherpaError::CatalogParse {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
            if let Some(previous) = recipes.insert(recipe.tool.clone(), recipe) {
                return Err(SherpaError::CatalogValidation {
                    message: format!("duplicate recipe for tool '{}'", previous.tool),
                });
            }
        }
        Ok(Self { recipes })
    }

    /// Look up a recipe by tool id.
    pub fn get(&self, tool: &str) -> Option<&Recipe> {
        self.recipes.get(tool)
    }

    /// Look up a recipe, erroring with the unknown tool name.
    pub fn require(&self, tool: &str) -> Result<&Recipe> {
        self.get(tool).ok_or_else(|| SherpaError::UnknownTool {
            tool: tool.to_string(),
        })
    }

    /// All recipes in tool-id order.
    pub fn tools(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// The recipe whose tool id or installed binary is `binary`, used to
    /// turn a missing-binary unlock into an installable dependency.
    pub fn tool_providing(&self, binary: &str) -> Option<&Recipe> {
        self.recipes
            .get(binary)
            .or_else(|| self.recipes.values().find(|r| r.bin == binary))
    }
}
