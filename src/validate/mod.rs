use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One failed field check, echoed to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failing rule collected in payload order, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed ({} field errors)", self.0.len())
    }
}

impl std::error::Error for ValidationErrors {}

/// Declarative checks applied to one payload field. A field stops at its
/// first failing rule; failures across fields accumulate.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required {
        message: &'static str,
    },
    /// Length bounds on the trimmed string value. Skipped when the field is
    /// absent or null; a non-string value fails the rule.
    TrimmedLen {
        min: usize,
        max: usize,
        message: &'static str,
    },
    OneOf {
        allowed: &'static [&'static str],
        message: &'static str,
    },
    Array {
        max: Option<usize>,
        type_message: &'static str,
        max_message: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

const CATEGORIES: &[&str] = &["Technology", "Business", "Political", "Other"];

pub const CREATE_ARTICLE_RULES: &[FieldRules] = &[
    FieldRules {
        field: "title",
        rules: &[
            Rule::Required {
                message: "Title is required",
            },
            Rule::TrimmedLen {
                min: 5,
                max: 200,
                message: "Title must be 5-200 characters",
            },
        ],
    },
    FieldRules {
        field: "content",
        rules: &[
            Rule::Required {
                message: "Content is required",
            },
            Rule::TrimmedLen {
                min: 20,
                max: usize::MAX,
                message: "Content must be at least 20 characters",
            },
        ],
    },
    FieldRules {
        field: "category",
        rules: &[Rule::OneOf {
            allowed: CATEGORIES,
            message: "Invalid category",
        }],
    },
    FieldRules {
        field: "excerpt",
        rules: &[Rule::TrimmedLen {
            min: 0,
            max: 500,
            message: "Excerpt must be max 500 characters",
        }],
    },
    FieldRules {
        field: "tags",
        rules: &[Rule::Array {
            max: Some(10),
            type_message: "Tags must be an array",
            max_message: "Maximum 10 tags allowed",
        }],
    },
    FieldRules {
        field: "author",
        rules: &[Rule::TrimmedLen {
            min: 0,
            max: 100,
            message: "Author name must be max 100 characters",
        }],
    },
    FieldRules {
        field: "seoMetaDescription",
        rules: &[Rule::TrimmedLen {
            min: 0,
            max: 160,
            message: "Meta description must be max 160 characters",
        }],
    },
    FieldRules {
        field: "seoKeywords",
        rules: &[Rule::Array {
            max: None,
            type_message: "Keywords must be an array",
            max_message: "",
        }],
    },
];

/// Update rules are the create rules with nothing required: patch semantics.
pub const UPDATE_ARTICLE_RULES: &[FieldRules] = &[
    FieldRules {
        field: "title",
        rules: &[Rule::TrimmedLen {
            min: 5,
            max: 200,
            message: "Title must be 5-200 characters",
        }],
    },
    FieldRules {
        field: "content",
        rules: &[Rule::TrimmedLen {
            min: 20,
            max: usize::MAX,
            message: "Content must be at least 20 characters",
        }],
    },
    FieldRules {
        field: "category",
        rules: &[Rule::OneOf {
            allowed: CATEGORIES,
            message: "Invalid category",
        }],
    },
    FieldRules {
        field: "excerpt",
        rules: &[Rule::TrimmedLen {
            min: 0,
            max: 500,
            message: "Excerpt must be max 500 characters",
        }],
    },
    FieldRules {
        field: "tags",
        rules: &[Rule::Array {
            max: Some(10),
            type_message: "Tags must be an array",
            max_message: "Maximum 10 tags allowed",
        }],
    },
    FieldRules {
        field: "author",
        rules: &[Rule::TrimmedLen {
            min: 0,
            max: 100,
            message: "Author name must be max 100 characters",
        }],
    },
    FieldRules {
        field: "seoMetaDescription",
        rules: &[Rule::TrimmedLen {
            min: 0,
            max: 160,
            message: "Meta description must be max 160 characters",
        }],
    },
    FieldRules {
        field: "seoKeywords",
        rules: &[Rule::Array {
            max: None,
            type_message: "Keywords must be an array",
            max_message: "",
        }],
    },
];

/// Run a rule table against a raw JSON payload. Runs before any store access
/// or sanitization; the caller aborts the request on `Err`.
pub fn validate(rules: &[FieldRules], payload: &Value) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for field_rules in rules {
        let value = payload.get(field_rules.field);
        if let Some(message) = check_field(field_rules.rules, value) {
            errors.push(FieldError {
                field: field_rules.field.to_string(),
                message,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_field(rules: &[Rule], value: Option<&Value>) -> Option<String> {
    let present = matches!(value, Some(v) if !v.is_null());

    for rule in rules {
        match rule {
            Rule::Required { message } => {
                let empty = match value {
                    Some(Value::String(s)) => s.trim().is_empty(),
                    Some(v) => v.is_null(),
                    None => true,
                };
                if empty {
                    return Some((*message).to_string());
                }
            }
            Rule::TrimmedLen { min, max, message } => {
                if !present {
                    continue;
                }
                match value {
                    Some(Value::String(s)) => {
                        let len = s.trim().chars().count();
                        if len < *min || len > *max {
                            return Some((*message).to_string());
                        }
                    }
                    _ => return Some((*message).to_string()),
                }
            }
            Rule::OneOf { allowed, message } => {
                if !present {
                    continue;
                }
                match value {
                    Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
                    _ => return Some((*message).to_string()),
                }
            }
            Rule::Array {
                max,
                type_message,
                max_message,
            } => {
                if !present {
                    continue;
                }
                match value {
                    Some(Value::Array(items)) => {
                        if let Some(max) = max {
                            if items.len() > *max {
                                return Some((*max_message).to_string());
                            }
                        }
                    }
                    _ => return Some((*type_message).to_string()),
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages_for(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn valid_create_payload_passes() {
        let payload = json!({
            "title": "A perfectly fine title",
            "content": "This content is longer than twenty characters.",
            "category": "Technology",
            "tags": ["a", "b"],
        });
        assert!(validate(CREATE_ARTICLE_RULES, &payload).is_ok());
    }

    #[test]
    fn missing_title_and_short_content_both_reported() {
        let payload = json!({ "content": "short" });
        let errors = validate(CREATE_ARTICLE_RULES, &payload).unwrap_err();
        assert_eq!(messages_for(&errors, "title"), vec!["Title is required"]);
        assert_eq!(
            messages_for(&errors, "content"),
            vec!["Content must be at least 20 characters"]
        );
        assert_eq!(errors.0.len(), 2);
    }

    #[test]
    fn title_length_bounds_are_trimmed() {
        let payload = json!({
            "title": "    hi    ",
            "content": "This content is longer than twenty characters.",
        });
        let errors = validate(CREATE_ARTICLE_RULES, &payload).unwrap_err();
        assert_eq!(
            messages_for(&errors, "title"),
            vec!["Title must be 5-200 characters"]
        );
    }

    #[test]
    fn invalid_category_rejected() {
        let payload = json!({
            "title": "A perfectly fine title",
            "content": "This content is longer than twenty characters.",
            "category": "Data Science",
        });
        let errors = validate(CREATE_ARTICLE_RULES, &payload).unwrap_err();
        assert_eq!(messages_for(&errors, "category"), vec!["Invalid category"]);
    }

    #[test]
    fn tags_must_be_an_array_of_at_most_ten() {
        let not_array = json!({
            "title": "A perfectly fine title",
            "content": "This content is longer than twenty characters.",
            "tags": "climate",
        });
        let errors = validate(CREATE_ARTICLE_RULES, &not_array).unwrap_err();
        assert_eq!(messages_for(&errors, "tags"), vec!["Tags must be an array"]);

        let too_many = json!({
            "title": "A perfectly fine title",
            "content": "This content is longer than twenty characters.",
            "tags": ["1","2","3","4","5","6","7","8","9","10","11"],
        });
        let errors = validate(CREATE_ARTICLE_RULES, &too_many).unwrap_err();
        assert_eq!(
            messages_for(&errors, "tags"),
            vec!["Maximum 10 tags allowed"]
        );
    }

    #[test]
    fn update_rules_require_nothing() {
        assert!(validate(UPDATE_ARTICLE_RULES, &json!({})).is_ok());
    }

    #[test]
    fn update_rules_still_bound_supplied_fields() {
        let payload = json!({ "excerpt": "x".repeat(501) });
        let errors = validate(UPDATE_ARTICLE_RULES, &payload).unwrap_err();
        assert_eq!(
            messages_for(&errors, "excerpt"),
            vec!["Excerpt must be max 500 characters"]
        );
    }

    #[test]
    fn null_optional_fields_are_skipped() {
        let payload = json!({
            "title": "A perfectly fine title",
            "content": "This content is longer than twenty characters.",
            "category": null,
            "tags": null,
        });
        assert!(validate(CREATE_ARTICLE_RULES, &payload).is_ok());
    }
}
