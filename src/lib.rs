//! Generates Python type-hint classes from a Google API discovery document.

pub mod builder;
pub mod config;
pub mod discovery;
pub mod error;
pub mod format;
pub mod http;
pub mod output;
pub mod params;
pub mod template;
pub mod types;

use crate::builder::ClassBuilder;
use crate::config::GeneratorConfig;
use crate::discovery::Descriptor;
use crate::error::GenerateResult;

/// Renders the unformatted module text for `descriptor`.
pub fn render(descriptor: &Descriptor, config: &GeneratorConfig) -> GenerateResult<String> {
    ClassBuilder::new(descriptor, config)?.build_module()
}
