use crate::discovery::{Method, Parameter};
use crate::error::{GenerateError, GenerateResult};

/// Name of the parameter injected for methods that take a request payload.
pub const BODY_PARAM: &str = "body";

/// Orders a method's parameters for rendering.
///
/// Required parameters come first in `parameterOrder`, then the synthesized
/// `body` parameter when the method takes a payload, then everything else
/// in the order the descriptor lists it.
pub fn collect_parameters(method: &Method) -> GenerateResult<Vec<Parameter>> {
    let mut remaining = method.parameters.clone();
    let mut out = Vec::with_capacity(remaining.len() + 1);

    for name in &method.parameter_order {
        let mut param = remaining.shift_remove(name).ok_or_else(|| {
            GenerateError::MissingRequiredParameter {
                method: method.id.clone(),
                parameter: name.clone(),
            }
        })?;
        param.name = name.clone();
        out.push(param);
    }

    if method.has_request_body() {
        out.push(body_parameter(method));
    }

    for (name, mut param) in remaining {
        param.name = name;
        out.push(param);
    }

    Ok(out)
}

fn body_parameter(method: &Method) -> Parameter {
    Parameter {
        name: BODY_PARAM.to_string(),
        kind: "object".to_string(),
        required: true,
        repeated: false,
        variants: Vec::new(),
        description: format!(
            "The request body containing more data. A detailed description of its \
             structure and possible values can be found in the \
             [official documentation]({}#request-body).",
            method_docs_url(method)
        ),
    }
}

/// Best-effort link to the method's reference page.
///
/// `sheets.spreadsheets.values.get` with path `v4/...` becomes
/// `https://developers.google.com/sheets/reference/rest/v4/spreadsheets.values/get`.
pub fn method_docs_url(method: &Method) -> String {
    let parts: Vec<&str> = method.id.split('.').collect();
    let api_name = parts.first().copied().unwrap_or_default();
    let resource_path = if parts.len() > 2 {
        parts[1..parts.len() - 1].join(".")
    } else {
        String::new()
    };
    let api_version = method.path.split('/').next().unwrap_or_default();
    format!(
        "https://developers.google.com/{api_name}/reference/rest/{api_version}/{resource_path}/{}",
        method.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn method(value: serde_json::Value) -> Method {
        let mut method: Method = serde_json::from_value(value).unwrap();
        method.name = method.id.rsplit('.').next().unwrap().to_string();
        method
    }

    fn names(params: &[Parameter]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_should_order_required_then_body_then_rest() {
        let m = method(json!({
            "id": "sheets.spreadsheets.values.update",
            "httpMethod": "PUT",
            "path": "v4/spreadsheets/{a}/values/{b}",
            "parameterOrder": ["a", "b"],
            "parameters": {
                "c": {"type": "string"},
                "b": {"type": "string", "required": true},
                "a": {"type": "string", "required": true}
            },
            "request": {"$ref": "ValueRange"}
        }));
        let params = collect_parameters(&m).unwrap();
        assert_eq!(names(&params), ["a", "b", "body", "c"]);

        let body = &params[2];
        assert!(body.required);
        assert_eq!(body.kind, "object");
        assert!(body.description.contains(
            "https://developers.google.com/sheets/reference/rest/v4/spreadsheets.values/update#request-body"
        ));
    }

    #[test]
    fn test_should_keep_descriptor_order_for_optional_parameters() {
        let m = method(json!({
            "id": "docs.documents.get",
            "httpMethod": "GET",
            "path": "v1/documents/{documentId}",
            "parameterOrder": ["documentId"],
            "parameters": {
                "zeta": {"type": "string"},
                "documentId": {"type": "string", "required": true},
                "alpha": {"type": "boolean"}
            }
        }));
        let params = collect_parameters(&m).unwrap();
        assert_eq!(names(&params), ["documentId", "zeta", "alpha"]);
    }

    #[test]
    fn test_should_fail_on_missing_required_parameter() {
        let m = method(json!({
            "id": "sheets.spreadsheets.get",
            "httpMethod": "GET",
            "path": "v4/spreadsheets/{x}",
            "parameterOrder": ["x"],
            "parameters": {}
        }));
        let err = collect_parameters(&m).unwrap_err();
        match err {
            GenerateError::MissingRequiredParameter { parameter, .. } => assert_eq!(parameter, "x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_should_not_mutate_method() {
        let m = method(json!({
            "id": "sheets.spreadsheets.get",
            "httpMethod": "GET",
            "path": "v4/spreadsheets/{x}",
            "parameterOrder": ["x"],
            "parameters": {"x": {"type": "string", "required": true}}
        }));
        collect_parameters(&m).unwrap();
        assert!(collect_parameters(&m).is_ok());
        assert_eq!(m.parameters.len(), 1);
    }

    #[test]
    fn test_should_build_docs_url_for_top_level_method() {
        let m = method(json!({
            "id": "sheets.spreadsheets.create",
            "httpMethod": "POST",
            "path": "v4/spreadsheets"
        }));
        assert_eq!(
            method_docs_url(&m),
            "https://developers.google.com/sheets/reference/rest/v4/spreadsheets/create"
        );
    }
}
