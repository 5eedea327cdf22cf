//! Generator configuration.
//!
//! Everything the renderer needs beyond the descriptor itself lives here and
//! is handed to [`crate::builder::ClassBuilder`] explicitly. Values come from
//! the defaults below, an optional YAML file, and the environment; the binary
//! layers its command-line flags on top.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GenerateError, GenerateResult};
use crate::template::TemplateSet;

pub const DEFAULT_DISCOVERY_URL: &str = "https://sheets.googleapis.com/$discovery/rest?version=v4";

/// Environment variable overriding [`GeneratorConfig::discovery_url`].
pub const DISCOVERY_URL_ENV: &str = "DISCOVERY_URL";

const DEFAULT_DOCSTRING: &str = "
{method_description}

#### More information about parameter values or the response structure can be found in the [official documentation]({method_docs}).

### Args
{arguments}

### Scopes
Requires one of the following
[Oauth scopes](https://developers.google.com/identity/protocols/OAuth2):
{scopes}
";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub discovery_url: String,
    pub templates: Templates,
    /// Python expression used as the default of every optional argument.
    pub kwarg_default: String,
    pub output_dir: PathBuf,
    pub formatter: FormatterConfig,
}

/// Raw template text, as written by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Templates {
    pub arg: String,
    pub kwarg: String,
    pub scope: String,
    pub docstring: String,
    pub method_code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatterConfig {
    pub enabled: bool,
    pub program: String,
    pub line_length: u16,
    pub preview: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            discovery_url: DEFAULT_DISCOVERY_URL.to_owned(),
            templates: Templates::default(),
            kwarg_default: "None".to_owned(),
            output_dir: PathBuf::from("."),
            formatter: FormatterConfig::default(),
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        let arg = "- `{name}: {type}` {description}";
        Self {
            arg: arg.to_owned(),
            kwarg: format!("{arg}\n\t- Defaults to: `{{default}}`"),
            scope: "- {scope_url}".to_owned(),
            docstring: DEFAULT_DOCSTRING.to_owned(),
            method_code: "\npass\n".to_owned(),
        }
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "black".to_owned(),
            line_length: 80,
            preview: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_yaml_file(path: &Path) -> GenerateResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
            .map_err(|err| GenerateError::Config(format!("{}: {err}", path.display())))
    }

    pub fn from_yaml_str(raw: &str) -> GenerateResult<Self> {
        serde_yaml::from_str(raw).map_err(|err| GenerateError::Config(err.to_string()))
    }

    /// Applies environment overrides in place.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(DISCOVERY_URL_ENV) {
            if !url.is_empty() {
                self.discovery_url = url;
            }
        }
    }

    /// Parses every template, failing on the first unknown placeholder.
    pub fn compile_templates(&self) -> GenerateResult<TemplateSet> {
        Ok(TemplateSet::compile(&self.templates)?)
    }
}
