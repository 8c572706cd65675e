//! Compile request parsing.
//!
//! The raw JSON body is checked field by field first so the caller receives
//! every violation at once; only a clean body is deserialized into types.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::content::ResumeContent;
use crate::models::customization::{ColorScheme, Customizations, FontFamily, SectionName};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub template_id: String,
    pub content: ResumeContent,
    #[serde(default)]
    pub customizations: Option<Customizations>,
}

/// Validates and parses a compile request body.
///
/// Returns all field-level messages when anything is wrong.
pub fn parse_compile_request(body: &Value) -> Result<CompileRequest, Vec<String>> {
    let errors = validate_compile_request(body);
    if !errors.is_empty() {
        return Err(errors);
    }
    serde_json::from_value(body.clone()).map_err(|e| vec![format!("Malformed request: {e}")])
}

pub fn validate_compile_request(body: &Value) -> Vec<String> {
    let Some(obj) = body.as_object() else {
        return vec!["Request body must be a JSON object".to_string()];
    };

    let mut errors = Vec::new();

    for field in ["templateId", "content"] {
        if !obj.contains_key(field) {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(id) = obj.get("templateId") {
        if !id.as_str().is_some_and(|s| !s.trim().is_empty()) {
            errors.push("templateId must be a non-empty string".to_string());
        }
    }

    if let Some(content) = obj.get("content") {
        match content.as_object() {
            Some(content) => validate_content(content, &mut errors),
            None => errors.push("content must be an object".to_string()),
        }
    }

    if let Some(custom) = obj.get("customizations") {
        match custom {
            Value::Null => {}
            Value::Object(custom) => validate_customizations(custom, &mut errors),
            _ => errors.push("customizations must be an object".to_string()),
        }
    }

    errors
}

fn validate_content(content: &Map<String, Value>, errors: &mut Vec<String>) {
    if let Some(info) = content.get("personalInfo") {
        match info.as_object() {
            Some(info) => check_text_fields(
                info,
                "personalInfo",
                &["name", "email"],
                &["phone", "location"],
                errors,
            ),
            None => errors.push("personalInfo must be an object".to_string()),
        }
    }

    if content.get("summary").is_some_and(|s| !s.is_string()) {
        errors.push("summary must be a string".to_string());
    }

    check_object_array(content, "experience", errors, |item, path, errors| {
        check_text_fields(item, path, &["title", "company"], &["duration"], errors);
        if let Some(bullets) = item.get("bullets") {
            check_string_array(bullets, &format!("{path}.bullets"), errors);
        }
    });

    check_object_array(content, "education", errors, |item, path, errors| {
        check_text_fields(item, path, &["degree", "school"], &[], errors);
        if item
            .get("year")
            .is_some_and(|y| !(y.is_string() || y.is_number()))
        {
            errors.push(format!("{path}.year must be a string or a number"));
        }
    });

    if let Some(skills) = content.get("skills") {
        check_string_array(skills, "skills", errors);
    }

    if let Some(certs) = content.get("certifications") {
        match certs.as_array() {
            Some(certs) => {
                for (i, cert) in certs.iter().enumerate() {
                    match cert {
                        Value::String(_) => {}
                        Value::Object(cert) => check_text_fields(
                            cert,
                            &format!("certifications[{i}]"),
                            &[],
                            &["name", "issuer", "date"],
                            errors,
                        ),
                        _ => errors.push(format!(
                            "certifications[{i}] must be a string or an object"
                        )),
                    }
                }
            }
            None => errors.push("certifications must be an array".to_string()),
        }
    }
}

/// Required fields must be present; every listed field that is present must be text.
fn check_text_fields(
    obj: &Map<String, Value>,
    path: &str,
    required: &[&str],
    optional: &[&str],
    errors: &mut Vec<String>,
) {
    for field in required {
        if !obj.contains_key(*field) {
            errors.push(format!("{path}.{field} is required"));
        }
    }
    for field in required.iter().chain(optional) {
        if obj.get(*field).is_some_and(|v| !v.is_string()) {
            errors.push(format!("{path}.{field} must be a string"));
        }
    }
}

fn check_string_array(value: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(items) = value.as_array() else {
        errors.push(format!("{path} must be an array"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        if !item.is_string() {
            errors.push(format!("{path}[{i}] must be a string"));
        }
    }
}

fn check_object_array<F>(
    content: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
    check_item: F,
) where
    F: Fn(&Map<String, Value>, &str, &mut Vec<String>),
{
    let Some(value) = content.get(key) else {
        return;
    };
    let Some(items) = value.as_array() else {
        errors.push(format!("{key} must be an array"));
        return;
    };

    for (i, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(item) => check_item(item, &format!("{key}[{i}]"), errors),
            None => errors.push(format!("{key}[{i}] must be an object")),
        }
    }
}

fn validate_customizations(custom: &Map<String, Value>, errors: &mut Vec<String>) {
    if let Some(color) = custom.get("colorScheme") {
        if !is_one_of(color, ColorScheme::ALLOWED) {
            errors.push(format!(
                "colorScheme must be one of: {}",
                ColorScheme::ALLOWED.join(", ")
            ));
        }
    }

    if let Some(font) = custom.get("fontFamily") {
        if !is_one_of(font, FontFamily::ALLOWED) {
            errors.push(format!(
                "fontFamily must be one of: {}",
                FontFamily::ALLOWED.join(", ")
            ));
        }
    }

    if let Some(sections) = custom.get("sections") {
        match sections.as_array() {
            Some(sections) => {
                for section in sections {
                    if !is_one_of(section, SectionName::ALLOWED) {
                        errors.push(format!("Invalid section: {}", display_value(section)));
                    }
                }
            }
            None => errors.push("sections must be an array".to_string()),
        }
    }
}

fn is_one_of(value: &Value, allowed: &[&str]) -> bool {
    value.as_str().is_some_and(|s| allowed.contains(&s))
}

fn display_value(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::Certification;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "templateId": "modern",
            "content": {
                "personalInfo": { "name": "Ada Lovelace", "email": "ada@example.com" },
                "experience": [{ "title": "Engineer", "company": "Analytical Engines" }],
                "education": [{ "degree": "BSc", "school": "London", "year": 1835 }],
                "skills": ["Rust", "LaTeX"],
                "certifications": ["PMP", { "name": "CKA", "issuer": "CNCF", "date": "2023" }]
            },
            "customizations": { "colorScheme": "blue", "fontFamily": "Times New Roman", "sections": ["summary", "experience"] }
        })
    }

    #[test]
    fn test_valid_request_parses() {
        let req = parse_compile_request(&valid_body()).unwrap();
        assert_eq!(req.template_id, "modern");
        assert_eq!(req.content.education[0].year, "1835");
        assert!(matches!(
            req.content.certifications[1],
            Certification::Detailed { .. }
        ));
        let custom = req.customizations.unwrap();
        assert_eq!(custom.color_scheme, Some(ColorScheme::Blue));
        assert_eq!(custom.font_family, Some(FontFamily::TimesNewRoman));
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = validate_compile_request(&json!({}));
        assert_eq!(
            errors,
            vec![
                "Missing required field: templateId",
                "Missing required field: content"
            ]
        );
    }

    #[test]
    fn test_collects_every_violation() {
        let errors = validate_compile_request(&json!({
            "templateId": "  ",
            "content": {
                "personalInfo": { "name": "Ada" },
                "experience": [{ "title": "Engineer" }, "oops"],
                "education": "none",
                "skills": ["Rust", 7]
            },
            "customizations": { "colorScheme": "magenta", "fontFamily": "Comic Sans", "sections": ["hobbies"] }
        }));
        assert_eq!(
            errors,
            vec![
                "templateId must be a non-empty string",
                "personalInfo.email is required",
                "experience[0].company is required",
                "experience[1] must be an object",
                "education must be an array",
                "skills[1] must be a string",
                "colorScheme must be one of: blue, green, red, purple, orange, gray, black",
                "fontFamily must be one of: Arial, Helvetica, Times New Roman, Calibri, Georgia",
                "Invalid section: hobbies",
            ]
        );
    }

    #[test]
    fn test_content_must_be_object() {
        let errors = validate_compile_request(&json!({ "templateId": "modern", "content": [] }));
        assert_eq!(errors, vec!["content must be an object"]);
    }

    #[test]
    fn test_customizations_must_be_object() {
        let errors = validate_compile_request(&json!({
            "templateId": "modern",
            "content": {},
            "customizations": "blue"
        }));
        assert_eq!(errors, vec!["customizations must be an object"]);
    }

    #[test]
    fn test_type_errors_are_collected_before_parsing() {
        let body = json!({
            "templateId": "modern",
            "content": {
                "personalInfo": { "name": null, "email": 42 },
                "summary": 3,
                "experience": [{ "title": "Engineer", "company": "Acme", "bullets": "not a list" }],
                "education": [{ "degree": "BSc", "school": "MIT", "year": true }],
                "certifications": [{ "name": 5, "issuer": "CNCF" }]
            }
        });
        let expected = vec![
            "personalInfo.name must be a string",
            "personalInfo.email must be a string",
            "summary must be a string",
            "experience[0].bullets must be an array",
            "education[0].year must be a string or a number",
            "certifications[0].name must be a string",
        ];
        assert_eq!(validate_compile_request(&body), expected);
        assert_eq!(parse_compile_request(&body).unwrap_err(), expected);
    }

    #[test]
    fn test_bullet_entries_must_be_strings() {
        let errors = validate_compile_request(&json!({
            "templateId": "modern",
            "content": {
                "experience": [{ "title": "Engineer", "company": "Acme", "duration": 2, "bullets": ["Shipped", 7] }]
            }
        }));
        assert_eq!(
            errors,
            vec![
                "experience[0].duration must be a string",
                "experience[0].bullets[1] must be a string",
            ]
        );
    }

    #[test]
    fn test_null_customizations_are_treated_as_absent() {
        let req = parse_compile_request(&json!({
            "templateId": "modern",
            "content": {},
            "customizations": null
        }))
        .unwrap();
        assert!(req.customizations.is_none());
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(
            parse_compile_request(&json!("hello")).unwrap_err(),
            vec!["Request body must be a JSON object"]
        );
    }
}
