use crate::discovery::Parameter;

/// Maps a discovery primitive kind onto its Python spelling.
///
/// Kinds outside the table are returned unchanged.
pub fn primitive_type(kind: &str) -> &str {
    match kind {
        "string" => "str",
        "integer" => "int",
        "boolean" => "bool",
        "number" | "float" => "float",
        "object" => "dict",
        "array" => "list",
        "null" => "None",
        other => other,
    }
}

/// Type expression for a parameter.
///
/// With `ignore_optional` unset, parameters that are not required are
/// wrapped in `Optional[..]`.
pub fn type_expr(param: &Parameter, ignore_optional: bool) -> String {
    let mut expr = if param.variants.is_empty() {
        primitive_type(&param.kind).to_string()
    } else {
        format!("Literal[\"{}\"]", param.variants.join("\", \""))
    };
    if param.repeated {
        expr = format!("list[{expr}]");
    }
    if !ignore_optional && !param.required {
        expr = format!("Optional[{expr}]");
    }
    expr
}
