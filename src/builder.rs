//! Renders a descriptor into Python class text.
//!
//! Fragments are joined with `\n` plus tab indentation, and a nested block
//! is shifted one level by [`indent`]. Tabs are expanded to four columns once
//! the whole module is assembled.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::discovery::{Descriptor, Method, Parameter, Resource};
use crate::error::GenerateResult;
use crate::params::{collect_parameters, method_docs_url};
use crate::template::{Placeholders, TemplateSet};
use crate::types::type_expr;

/// Suffix of the generated top-level class.
pub const CLASS_MARKER: &str = "Discovery";

const IMPORTS: &[&str] = &["from typing import Literal"];

pub struct ClassBuilder<'a> {
    descriptor: &'a Descriptor,
    templates: TemplateSet,
    kwarg_default: String,
    api: Placeholders,
}

impl<'a> ClassBuilder<'a> {
    pub fn new(descriptor: &'a Descriptor, config: &GeneratorConfig) -> GenerateResult<Self> {
        let mut api = Placeholders::new();
        api.set("api_name", descriptor.name.as_str())
            .set("api_version", descriptor.version.as_str())
            .set("api_title", descriptor.title.as_str())
            .set("api_description", descriptor.description.as_str())
            .set("api_docs", descriptor.documentation_link.as_str());

        Ok(Self {
            descriptor,
            templates: config.compile_templates()?,
            kwarg_default: config.kwarg_default.clone(),
            api,
        })
    }

    pub fn class_name(&self) -> String {
        class_name(&self.descriptor.title)
    }

    /// Import lines followed by the class, tabs expanded.
    pub fn build_module(&self) -> GenerateResult<String> {
        let class = self.build_class()?;
        let module = format!("{}\n{class}", IMPORTS.join("\n"));
        Ok(expand_tabs(&module, 4))
    }

    pub fn build_class(&self) -> GenerateResult<String> {
        let resources = self
            .descriptor
            .resources
            .values()
            .map(|resource| self.build_resource(resource))
            .collect::<GenerateResult<Vec<_>>>()?;

        Ok(format!(
            "class {}:\n\t{}\n\t\tself.url = \"{}\"\n\t{}",
            self.class_name(),
            build_init(&self.descriptor.resources),
            self.descriptor.discovery_url(),
            indent(&resources.join("\n")),
        ))
    }

    /// Nested container for one resource: initializer, child containers,
    /// then the resource's own methods.
    pub fn build_resource(&self, resource: &Resource) -> GenerateResult<String> {
        debug!(
            resource = %resource.name,
            children = resource.resources.len(),
            methods = resource.methods.len(),
            "rendering resource"
        );
        let children = resource
            .resources
            .values()
            .map(|child| self.build_resource(child))
            .collect::<GenerateResult<Vec<_>>>()?;
        let methods = resource
            .methods
            .values()
            .map(|method| self.build_method(method, false))
            .collect::<GenerateResult<Vec<_>>>()?;

        Ok(format!(
            "class {}:\n\t{}\n\t{}\n\t{}",
            container_name(&resource.name),
            build_init(&resource.resources),
            indent(&children.join("\n")),
            methods.join("\n\t"),
        ))
    }

    pub fn build_method(&self, method: &Method, is_function: bool) -> GenerateResult<String> {
        debug!(method = %method.id, "rendering method");
        let params = collect_parameters(method)?;

        let mut globals = self.api.clone();
        globals
            .set("method_name", method.name.as_str())
            .set("method_description", method.description.as_str())
            .set("method_docs", method_docs_url(method))
            .set("method_http_method", method.http_method.as_str())
            .set("method_id", method.id.as_str())
            .set("method_path", method.path.as_str());

        let signature = params
            .iter()
            .map(|param| self.signature_entry(param))
            .collect::<Vec<_>>()
            .join(", ");
        let receiver = if is_function { "" } else { "self, " };

        let arguments = params
            .iter()
            .map(|param| self.argument_line(param, &globals))
            .collect::<GenerateResult<Vec<_>>>()?
            .join("\n");
        let scopes = method
            .scopes
            .iter()
            .map(|scope| self.templates.scope.render(&globals.with("scope_url", scope.as_str())))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let mut doc_values = globals.clone();
        doc_values.set("arguments", arguments).set("scopes", scopes);
        let docstring = self.templates.docstring.render(&doc_values)?;

        let mut code_values = globals;
        code_values
            .set("defaults", self.defaults_literal(&params))
            .set("arguments", arguments_literal(&params));
        let code = self.templates.method_code.render(&code_values)?;
        let body = code.trim().split('\n').collect::<Vec<_>>().join("\n\t\t");

        Ok(format!(
            "def {}({receiver}{signature}):\n\t\t{docstring}\n\t\t{body}",
            method.name
        ))
    }

    fn signature_entry(&self, param: &Parameter) -> String {
        let ty = type_expr(param, true);
        if param.required {
            format!("{}: {ty}", param.name)
        } else {
            format!("{}: {ty} = {}", param.name, self.kwarg_default)
        }
    }

    fn argument_line(&self, param: &Parameter, globals: &Placeholders) -> GenerateResult<String> {
        let mut values = globals.clone();
        values
            .set("name", param.name.as_str())
            .set("type", type_expr(param, false))
            .set("description", param.description.as_str());
        let line = if param.required {
            self.templates.arg.render(&values)?
        } else {
            values.set("default", self.kwarg_default.as_str());
            self.templates.kwarg.render(&values)?
        };
        Ok(line)
    }

    /// `{'name': default, ..}` for every optional parameter.
    fn defaults_literal(&self, params: &[Parameter]) -> String {
        let entries = params
            .iter()
            .filter(|param| !param.required)
            .map(|param| format!("'{}': {}", param.name, self.kwarg_default))
            .collect::<Vec<_>>();
        format!("{{{}}}", entries.join(", "))
    }
}

/// `{"name": name, ..}` for every parameter.
fn arguments_literal(params: &[Parameter]) -> String {
    let entries = params
        .iter()
        .map(|param| format!("\"{0}\": {0}", param.name))
        .collect::<Vec<_>>();
    format!("{{{}}}", entries.join(", "))
}

fn build_init(resources: &IndexMap<String, Resource>) -> String {
    let fields = resources
        .keys()
        .map(|name| format!("self.{name} = self.{}()", container_name(name)))
        .collect::<Vec<_>>();
    let body = if fields.is_empty() {
        "pass".to_string()
    } else {
        fields.join("\n\t\t")
    };
    format!("def __init__(self) -> None:\n\t\t{body}")
}

/// Generated top-level class name for an API title.
pub fn class_name(title: &str) -> String {
    format!("{}{CLASS_MARKER}", sanitize_identifier(title))
}

/// Drops every character that is not an ASCII letter or `_`.
///
/// Digits go too, so the result is always a valid identifier prefix:
/// `Google Docs API (v1)` becomes `GoogleDocsAPIv`.
pub fn sanitize_identifier(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '_')
        .collect()
}

/// `_` followed by the name with its first letter upper-cased and the rest
/// lower-cased.
pub fn container_name(resource: &str) -> String {
    let mut chars = resource.chars();
    let mut out = String::from("_");
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
    out
}

fn indent(text: &str) -> String {
    text.replace('\n', "\n\t")
}

/// Replaces tabs with spaces up to the next multiple of `width` columns.
pub fn expand_tabs(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = width - column % width;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(ch);
                column = 0;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}
