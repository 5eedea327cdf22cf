//! Placeholder templates for the generated method text.
//!
//! Templates use `{name}` placeholders; `{{` and `}}` produce literal braces.
//! Each template kind accepts the global placeholders plus a few of its own,
//! and anything else is rejected when the template is parsed.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::config::Templates;

/// Placeholders every template may use.
pub const GLOBAL_PLACEHOLDERS: [&str; 11] = [
    "method_name",
    "method_description",
    "method_docs",
    "method_http_method",
    "method_id",
    "method_path",
    "api_title",
    "api_description",
    "api_docs",
    "api_name",
    "api_version",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' uses unknown placeholder '{{{placeholder}}}'")]
    UnknownPlaceholder {
        template: TemplateKind,
        placeholder: String,
    },

    #[error("template '{template}' has no value for placeholder '{{{placeholder}}}'")]
    UnresolvedPlaceholder {
        template: TemplateKind,
        placeholder: String,
    },

    #[error("template '{template}' has an unclosed '{{' at byte {offset}")]
    UnclosedBrace { template: TemplateKind, offset: usize },

    #[error("template '{template}' has a single '}}' at byte {offset}; use '}}}}' for a literal brace")]
    UnmatchedClosingBrace { template: TemplateKind, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Arg,
    Kwarg,
    Scope,
    Docstring,
    MethodCode,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Arg => "arg",
            TemplateKind::Kwarg => "kwarg",
            TemplateKind::Scope => "scope",
            TemplateKind::Docstring => "docstring",
            TemplateKind::MethodCode => "method_code",
        }
    }

    /// Placeholders this kind accepts on top of [`GLOBAL_PLACEHOLDERS`].
    pub fn extra_placeholders(self) -> &'static [&'static str] {
        match self {
            TemplateKind::Arg => &["name", "type", "description"],
            TemplateKind::Kwarg => &["name", "type", "description", "default"],
            TemplateKind::Scope => &["scope_url"],
            TemplateKind::Docstring => &["arguments", "scopes"],
            TemplateKind::MethodCode => &["defaults", "arguments"],
        }
    }

    pub fn accepts(self, placeholder: &str) -> bool {
        GLOBAL_PLACEHOLDERS.contains(&placeholder)
            || self.extra_placeholders().contains(&placeholder)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A parsed, validated template.
#[derive(Debug, Clone)]
pub struct Template {
    kind: TemplateKind,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(kind: TemplateKind, source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '{' if chars.peek().is_some_and(|(_, next)| *next == '{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek().is_some_and(|(_, next)| *next == '}') => {
                    chars.next();
                    text.push('}');
                }
                '}' => {
                    return Err(TemplateError::UnmatchedClosingBrace {
                        template: kind,
                        offset,
                    });
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace {
                            template: kind,
                            offset,
                        });
                    }
                    if !kind.accepts(&name) {
                        return Err(TemplateError::UnknownPlaceholder {
                            template: kind,
                            placeholder: name,
                        });
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                c => text.push(c),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { kind, segments })
    }

    pub fn render(&self, values: &Placeholders) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values.get(name).ok_or_else(|| {
                        TemplateError::UnresolvedPlaceholder {
                            template: self.kind,
                            placeholder: name.clone(),
                        }
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Resolved placeholder values for one render call.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: HashMap<&'static str, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    /// Copy of `self` with one more value set.
    pub fn with(&self, name: &'static str, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.set(name, value);
        next
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// The full set of templates used to render one method.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub arg: Template,
    pub kwarg: Template,
    pub scope: Template,
    /// Wrapped in triple quotes and closed at method-body indentation.
    pub docstring: Template,
    pub method_code: Template,
}

impl TemplateSet {
    pub fn compile(raw: &Templates) -> Result<Self, TemplateError> {
        let docstring = format!("\"\"\"{}\n\t\t\"\"\"", raw.docstring.trim());
        Ok(Self {
            arg: Template::parse(TemplateKind::Arg, raw.arg.trim())?,
            kwarg: Template::parse(TemplateKind::Kwarg, raw.kwarg.trim())?,
            scope: Template::parse(TemplateKind::Scope, raw.scope.trim())?,
            docstring: Template::parse(TemplateKind::Docstring, &docstring)?,
            method_code: Template::parse(TemplateKind::MethodCode, &raw.method_code)?,
        })
    }
}
