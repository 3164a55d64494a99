use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::CARD_TYPE;

/// Top-level actions beyond this cap degrade on most surfaces, so the
/// overflow is advisory rather than fatal.
pub const MAX_TOP_LEVEL_ACTIONS: usize = 6;

const MIN_SUPPORTED_VERSION: f64 = 1.0;
const MAX_SUPPORTED_VERSION: f64 = 1.5;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub path: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    fn error(&mut self, code: &str, message: impl Into<String>, path: impl Into<String>) {
        self.errors.push(ValidationIssue {
            code: code.to_string(),
            message: message.into(),
            path: path.into(),
        });
    }

    fn warning(&mut self, code: &str, message: impl Into<String>, path: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            code: code.to_string(),
            message: message.into(),
            path: path.into(),
        });
    }
}

/// Runs the structural and business-rule validators and concatenates their
/// reports. Never fails fast; every violation in the tree is reported.
pub fn validate(card: &Value) -> ValidationReport {
    let mut report = validate_structure(card);
    report.merge(validate_business_rules(card));
    report
}

/// Per-variant structural rule check, recursive over `body`,
/// `Container.items`, `ActionSet.actions`, `actions`, and nested
/// `Action.ShowCard` cards. An unrecognized-but-present type tag is not an
/// error here; unknown node kinds are resolved at render time.
pub fn validate_structure(card: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(root) = card.as_object() else {
        report.error("INVALID_ROOT", "card must be a JSON object", "");
        return report;
    };
    check_card(root, "", true, &mut report);
    report
}

fn check_card(card: &Map<String, Value>, path: &str, is_root: bool, report: &mut ValidationReport) {
    match card.get("type") {
        None => report.error(
            "MISSING_TYPE",
            "card is missing its type discriminator",
            join(path, "type"),
        ),
        Some(tag) if tag.as_str() != Some(CARD_TYPE) => report.error(
            "INVALID_CARD_TYPE",
            format!("card type must be \"{CARD_TYPE}\""),
            join(path, "type"),
        ),
        Some(_) => {}
    }

    match card.get("version") {
        // Nested show-card bodies inherit the host card's version.
        None if is_root => report.error(
            "MISSING_VERSION",
            "card must declare a version",
            join(path, "version"),
        ),
        Some(version) if !version.is_string() => report.error(
            "INVALID_VERSION",
            "version must be a string",
            join(path, "version"),
        ),
        _ => {}
    }

    match card.get("body") {
        None => report.error("MISSING_BODY", "card must include a body", join(path, "body")),
        Some(Value::Array(items)) => {
            let base = join(path, "body");
            for (idx, item) in items.iter().enumerate() {
                check_element(item, &format!("{base}[{idx}]"), report);
            }
        }
        Some(_) => report.error("INVALID_BODY", "body must be an array", join(path, "body")),
    }

    match card.get("actions") {
        None => {}
        Some(Value::Array(actions)) => {
            let base = join(path, "actions");
            for (idx, action) in actions.iter().enumerate() {
                check_action(action, &format!("{base}[{idx}]"), report);
            }
        }
        Some(_) => report.error(
            "INVALID_ACTIONS",
            "actions must be an array",
            join(path, "actions"),
        ),
    }
}

fn check_element(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(element) = value.as_object() else {
        report.error("INVALID_ELEMENT", "element must be a JSON object", path);
        return;
    };
    let Some(tag) = element.get("type").and_then(Value::as_str) else {
        report.error(
            "MISSING_TYPE",
            "element is missing its type tag",
            join(path, "type"),
        );
        return;
    };

    match tag {
        "TextBlock" => require_string(
            element,
            "text",
            "MISSING_TEXT",
            "TextBlock requires non-empty text",
            path,
            report,
        ),
        "Image" => require_string(
            element,
            "url",
            "MISSING_URL",
            "Image requires a url",
            path,
            report,
        ),
        "Input.Text" => require_string(
            element,
            "id",
            "MISSING_ID",
            "Input.Text requires an id",
            path,
            report,
        ),
        "Container" => {
            match element.get("items") {
                None => report.error(
                    "MISSING_ITEMS",
                    "Container requires items",
                    join(path, "items"),
                ),
                Some(Value::Array(items)) => {
                    let base = join(path, "items");
                    for (idx, item) in items.iter().enumerate() {
                        check_element(item, &format!("{base}[{idx}]"), report);
                    }
                }
                Some(_) => report.error(
                    "INVALID_ITEMS",
                    "Container items must be an array",
                    join(path, "items"),
                ),
            }
            if let Some(select_action) = element.get("selectAction") {
                check_action(select_action, &join(path, "selectAction"), report);
            }
        }
        "ActionSet" => match element.get("actions") {
            None => report.error(
                "MISSING_ACTIONS",
                "ActionSet requires actions",
                join(path, "actions"),
            ),
            Some(Value::Array(actions)) => {
                let base = join(path, "actions");
                for (idx, action) in actions.iter().enumerate() {
                    check_action(action, &format!("{base}[{idx}]"), report);
                }
            }
            Some(_) => report.error(
                "INVALID_ACTIONS",
                "ActionSet actions must be an array",
                join(path, "actions"),
            ),
        },
        _ => {}
    }
}

fn check_action(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(action) = value.as_object() else {
        report.error("INVALID_ACTION", "action must be a JSON object", path);
        return;
    };
    let Some(tag) = action.get("type").and_then(Value::as_str) else {
        report.error(
            "MISSING_TYPE",
            "action is missing its type tag",
            join(path, "type"),
        );
        return;
    };

    match tag {
        "Action.OpenUrl" => require_string(
            action,
            "url",
            "MISSING_URL",
            "Action.OpenUrl requires a url",
            path,
            report,
        ),
        "Action.ShowCard" => match action.get("card") {
            None => report.error(
                "MISSING_CARD",
                "Action.ShowCard requires a card",
                join(path, "card"),
            ),
            Some(Value::Object(card)) => check_card(card, &join(path, "card"), false, report),
            Some(_) => report.error(
                "INVALID_CARD",
                "Action.ShowCard card must be an object",
                join(path, "card"),
            ),
        },
        // Action.Submit has no required fields; unknown tags pass through.
        _ => {}
    }
}

fn require_string(
    node: &Map<String, Value>,
    key: &str,
    code: &str,
    message: &str,
    path: &str,
    report: &mut ValidationReport,
) {
    let present = node
        .get(key)
        .and_then(Value::as_str)
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    if !present {
        report.error(code, message, join(path, key));
    }
}

/// Whole-tree invariants on the raw card data: global id uniqueness,
/// version range, top-level action count, and empty containers. The three
/// advisory checks produce warnings only; a card carrying them still
/// parses and renders.
pub fn validate_business_rules(card: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids = HashSet::new();
    walk_ids(card, "", &mut seen_ids, &mut report);
    check_version(card, &mut report);
    check_action_count(card, &mut report);
    walk_containers(card, "", &mut report);
    report
}

fn walk_ids(value: &Value, path: &str, seen: &mut HashSet<String>, report: &mut ValidationReport) {
    match value {
        Value::Object(map) => {
            if let Some(id) = map.get("id").and_then(Value::as_str)
                && !seen.insert(id.to_string())
            {
                report.error(
                    "DUPLICATE_ID",
                    format!("id \"{id}\" is used more than once"),
                    join(path, "id"),
                );
            }
            for (key, child) in map {
                walk_ids(child, &join(path, key), seen, report);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk_ids(item, &format!("{path}[{idx}]"), seen, report);
            }
        }
        _ => {}
    }
}

fn check_version(card: &Value, report: &mut ValidationReport) {
    let Some(version) = card.get("version").and_then(Value::as_str) else {
        return;
    };
    match version.parse::<f64>() {
        Ok(parsed) if !(MIN_SUPPORTED_VERSION..=MAX_SUPPORTED_VERSION).contains(&parsed) => {
            report.warning(
                "VERSION_OUT_OF_RANGE",
                format!("version {version} is outside the supported 1.0-1.5 range"),
                "version",
            );
        }
        Ok(_) => {}
        Err(_) => report.warning(
            "VERSION_UNPARSEABLE",
            format!("version \"{version}\" is not a major.minor number"),
            "version",
        ),
    }
}

fn check_action_count(card: &Value, report: &mut ValidationReport) {
    if let Some(actions) = card.get("actions").and_then(Value::as_array)
        && actions.len() > MAX_TOP_LEVEL_ACTIONS
    {
        report.warning(
            "TOO_MANY_ACTIONS",
            format!(
                "{} top-level actions exceed the platform limit of {MAX_TOP_LEVEL_ACTIONS}",
                actions.len()
            ),
            "actions",
        );
    }
}

fn walk_containers(value: &Value, path: &str, report: &mut ValidationReport) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("Container")
                && let Some(items) = map.get("items").and_then(Value::as_array)
                && items.is_empty()
            {
                report.warning("EMPTY_CONTAINER", "Container has no items", join(path, "items"));
            }
            for (key, child) in map {
                walk_containers(child, &join(path, key), report);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk_containers(item, &format!("{path}[{idx}]"), report);
            }
        }
        _ => {}
    }
}

fn join(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}
