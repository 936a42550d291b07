//! Declarative validation for the three request shapes: create body, update
//! body, and list query. Checks collect every violation into one field →
//! message map rather than stopping at the first, and successful outputs
//! carry the normalized, defaulted values — callers never touch the raw
//! input again.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use db::models::todo::{
    CreateTodo, ListTodosQuery, SortField, SortOrder, StatusFilter, TodoStatus, UpdateTodo,
};
use serde_json::Value;

const TITLE_MIN_CHARS: usize = 3;
const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 1000;
const PRIORITY_MIN: i64 = 0;
const PRIORITY_MAX: i64 = 5;
const LIMIT_MIN: i64 = 1;
const LIMIT_MAX: i64 = 100;

const CREATE_FIELDS: &[&str] = &["title", "description", "priority", "dueDate"];
const UPDATE_FIELDS: &[&str] = &["title", "description", "status", "priority", "dueDate"];
const LIST_PARAMS: &[&str] = &["page", "limit", "status", "search", "sortBy", "order"];

/// Aggregated field errors, keyed by field path.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.errors
    }
}

fn check_title(value: &Value) -> Result<String, &'static str> {
    let Some(title) = value.as_str() else {
        return Err("Title must be a string");
    };
    let chars = title.chars().count();
    if chars < TITLE_MIN_CHARS {
        Err("Title must be at least 3 characters")
    } else if chars > TITLE_MAX_CHARS {
        Err("Title must be at most 200 characters")
    } else {
        Ok(title.to_string())
    }
}

fn check_description(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.chars().count() <= DESCRIPTION_MAX_CHARS => {
            Ok(Some(text.clone()))
        }
        Value::String(_) => Err("Description must be at most 1000 characters"),
        _ => Err("Description must be a string"),
    }
}

fn check_status(value: &Value) -> Result<TodoStatus, &'static str> {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .ok_or("Status must be either pending or completed")
}

fn check_priority(value: &Value) -> Result<i64, &'static str> {
    let Some(priority) = value.as_i64() else {
        return Err("Priority must be an integer");
    };
    if (PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        Ok(priority)
    } else {
        Err("Priority must be between 0 and 5")
    }
}

fn check_due_date(value: &Value) -> Result<Option<DateTime<Utc>>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|_| "Due date must be a valid ISO 8601 date"),
        _ => Err("Due date must be a valid ISO 8601 date"),
    }
}

fn reject_unknown_keys(
    object: &serde_json::Map<String, Value>,
    allowed: &[&str],
    errors: &mut ValidationErrors,
) {
    for key in object.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.add(key.clone(), format!("{key} is not allowed"));
        }
    }
}

/// Create-body schema: title required (3–200 chars), description optional
/// (≤1000, empty string and null allowed), priority optional 0–5 default 0,
/// dueDate optional RFC 3339 or null. Status is not creatable.
pub fn validate_create(body: &Value) -> Result<CreateTodo, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let Some(object) = body.as_object() else {
        errors.add("body", "Request body must be a JSON object");
        return Err(errors);
    };

    let mut title = None;
    match object.get("title") {
        None | Some(Value::Null) => errors.add("title", "Title is required"),
        Some(value) => match check_title(value) {
            Ok(checked) => title = Some(checked),
            Err(message) => errors.add("title", message),
        },
    }

    let mut description = None;
    if let Some(value) = object.get("description") {
        match check_description(value) {
            Ok(checked) => description = checked,
            Err(message) => errors.add("description", message),
        }
    }

    let mut priority = 0;
    if let Some(value) = object.get("priority") {
        match check_priority(value) {
            Ok(checked) => priority = checked,
            Err(message) => errors.add("priority", message),
        }
    }

    let mut due_date = None;
    if let Some(value) = object.get("dueDate") {
        match check_due_date(value) {
            Ok(checked) => due_date = checked,
            Err(message) => errors.add("dueDate", message),
        }
    }

    reject_unknown_keys(object, CREATE_FIELDS, &mut errors);

    match (title, errors.is_empty()) {
        (Some(title), true) => Ok(CreateTodo {
            title,
            description,
            priority,
            due_date,
        }),
        _ => Err(errors),
    }
}

/// Update-body schema: every create field optional, plus status. An
/// explicit null on description/dueDate stages a real null assignment; a
/// body with no recognized fields is itself invalid.
pub fn validate_update(body: &Value) -> Result<UpdateTodo, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let Some(object) = body.as_object() else {
        errors.add("body", "Request body must be a JSON object");
        return Err(errors);
    };

    if object.is_empty() {
        errors.add("body", "At least one field must be provided for update");
        return Err(errors);
    }

    let mut update = UpdateTodo::default();

    if let Some(value) = object.get("title") {
        match check_title(value) {
            Ok(checked) => update.title = Some(checked),
            Err(message) => errors.add("title", message),
        }
    }
    if let Some(value) = object.get("description") {
        match check_description(value) {
            Ok(checked) => update.description = Some(checked),
            Err(message) => errors.add("description", message),
        }
    }
    if let Some(value) = object.get("status") {
        match check_status(value) {
            Ok(checked) => update.status = Some(checked),
            Err(message) => errors.add("status", message),
        }
    }
    if let Some(value) = object.get("priority") {
        match check_priority(value) {
            Ok(checked) => update.priority = Some(checked),
            Err(message) => errors.add("priority", message),
        }
    }
    if let Some(value) = object.get("dueDate") {
        match check_due_date(value) {
            Ok(checked) => update.due_date = Some(checked),
            Err(message) => errors.add("dueDate", message),
        }
    }

    reject_unknown_keys(object, UPDATE_FIELDS, &mut errors);

    if errors.is_empty() {
        Ok(update)
    } else {
        Err(errors)
    }
}

/// List-query schema. Every parameter is optional with a documented
/// default; unrecognized values and unrecognized parameter names reject
/// rather than silently coerce.
pub fn validate_list_query(
    params: &HashMap<String, String>,
) -> Result<ListTodosQuery, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut query = ListTodosQuery::default();

    if let Some(raw) = params.get("page") {
        match raw.parse::<i64>() {
            Ok(page) if page >= 1 => query.page = page,
            _ => errors.add("page", "Page must be a positive integer"),
        }
    }
    if let Some(raw) = params.get("limit") {
        match raw.parse::<i64>() {
            Ok(limit) if (LIMIT_MIN..=LIMIT_MAX).contains(&limit) => query.limit = limit,
            _ => errors.add("limit", "Limit must be between 1 and 100"),
        }
    }
    if let Some(raw) = params.get("status") {
        match raw.parse::<StatusFilter>() {
            Ok(status) => query.status = status,
            Err(_) => errors.add("status", "Status must be one of pending, completed, all"),
        }
    }
    if let Some(raw) = params.get("search") {
        query.search = raw.clone();
    }
    if let Some(raw) = params.get("sortBy") {
        match raw.parse::<SortField>() {
            Ok(sort_by) => query.sort_by = sort_by,
            Err(_) => errors.add(
                "sortBy",
                "Sort field must be one of createdAt, updatedAt, title",
            ),
        }
    }
    if let Some(raw) = params.get("order") {
        match raw.parse::<SortOrder>() {
            Ok(order) => query.order = order,
            Err(_) => errors.add("order", "Order must be either asc or desc"),
        }
    }

    for key in params.keys() {
        if !LIST_PARAMS.contains(&key.as_str()) {
            errors.add(key.clone(), format!("{key} is not allowed"));
        }
    }

    if errors.is_empty() {
        Ok(query)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn create_with_only_title_fills_defaults() {
        let data = validate_create(&json!({"title": "buy milk"})).unwrap();
        assert_eq!(data.title, "buy milk");
        assert_eq!(data.description, None);
        assert_eq!(data.priority, 0);
        assert_eq!(data.due_date, None);
    }

    #[test]
    fn create_title_boundaries_are_inclusive() {
        assert!(validate_create(&json!({"title": "abc"})).is_ok());
        assert!(validate_create(&json!({"title": "a".repeat(200)})).is_ok());

        let short = validate_create(&json!({"title": "ab"})).unwrap_err().into_map();
        assert_eq!(short["title"], "Title must be at least 3 characters");

        let long = validate_create(&json!({"title": "a".repeat(201)}))
            .unwrap_err()
            .into_map();
        assert_eq!(long["title"], "Title must be at most 200 characters");
    }

    #[test]
    fn create_requires_title() {
        let errors = validate_create(&json!({})).unwrap_err().into_map();
        assert_eq!(errors["title"], "Title is required");

        let null_title = validate_create(&json!({"title": null})).unwrap_err().into_map();
        assert_eq!(null_title["title"], "Title is required");
    }

    #[test]
    fn create_collects_every_violation_at_once() {
        let errors = validate_create(&json!({
            "title": "ab",
            "priority": 9,
            "dueDate": "tomorrow-ish"
        }))
        .unwrap_err()
        .into_map();

        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("priority"));
        assert!(errors.contains_key("dueDate"));
    }

    #[test]
    fn create_accepts_null_and_empty_description() {
        let with_null = validate_create(&json!({"title": "abc", "description": null})).unwrap();
        assert_eq!(with_null.description, None);

        let with_empty = validate_create(&json!({"title": "abc", "description": ""})).unwrap();
        assert_eq!(with_empty.description.as_deref(), Some(""));

        let too_long = validate_create(&json!({"title": "abc", "description": "d".repeat(1001)}))
            .unwrap_err()
            .into_map();
        assert_eq!(too_long["description"], "Description must be at most 1000 characters");
    }

    #[test]
    fn create_rejects_non_integer_and_out_of_range_priority() {
        let fractional = validate_create(&json!({"title": "abc", "priority": 2.5}))
            .unwrap_err()
            .into_map();
        assert_eq!(fractional["priority"], "Priority must be an integer");

        for bad in [-1, 6] {
            let errors = validate_create(&json!({"title": "abc", "priority": bad}))
                .unwrap_err()
                .into_map();
            assert_eq!(errors["priority"], "Priority must be between 0 and 5");
        }

        assert!(validate_create(&json!({"title": "abc", "priority": 5})).is_ok());
    }

    #[test]
    fn create_parses_due_date_and_rejects_garbage() {
        let data =
            validate_create(&json!({"title": "abc", "dueDate": "2026-09-01T12:00:00Z"})).unwrap();
        assert!(data.due_date.is_some());

        let errors = validate_create(&json!({"title": "abc", "dueDate": "next week"}))
            .unwrap_err()
            .into_map();
        assert_eq!(errors["dueDate"], "Due date must be a valid ISO 8601 date");
    }

    #[test]
    fn create_rejects_unknown_fields_including_status() {
        let errors = validate_create(&json!({"title": "abc", "status": "completed"}))
            .unwrap_err()
            .into_map();
        assert_eq!(errors["status"], "status is not allowed");
    }

    #[test]
    fn create_rejects_non_object_body() {
        let errors = validate_create(&json!(["title"])).unwrap_err().into_map();
        assert_eq!(errors["body"], "Request body must be a JSON object");
    }

    #[test]
    fn update_requires_at_least_one_recognized_field() {
        let empty = validate_update(&json!({})).unwrap_err().into_map();
        assert_eq!(empty["body"], "At least one field must be provided for update");

        let unrecognized = validate_update(&json!({"bogus": 1})).unwrap_err().into_map();
        assert_eq!(unrecognized["bogus"], "bogus is not allowed");
    }

    #[test]
    fn update_accepts_status_and_explicit_nulls() {
        let update = validate_update(&json!({
            "status": "completed",
            "description": null,
            "dueDate": null
        }))
        .unwrap();

        assert_eq!(update.status, Some(TodoStatus::Completed));
        assert_eq!(update.description, Some(None));
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.title, None);
    }

    #[test]
    fn update_rejects_invalid_status() {
        let errors = validate_update(&json!({"status": "done"})).unwrap_err().into_map();
        assert_eq!(errors["status"], "Status must be either pending or completed");
    }

    #[test]
    fn update_applies_same_title_rules_as_create() {
        let errors = validate_update(&json!({"title": "ab"})).unwrap_err().into_map();
        assert_eq!(errors["title"], "Title must be at least 3 characters");
    }

    #[test]
    fn list_query_defaults_when_empty() {
        let query = validate_list_query(&HashMap::new()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.search, "");
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn list_query_parses_every_parameter() {
        let query = validate_list_query(&query_map(&[
            ("page", "3"),
            ("limit", "25"),
            ("status", "completed"),
            ("search", "milk"),
            ("sortBy", "updatedAt"),
            ("order", "asc"),
        ]))
        .unwrap();

        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 25);
        assert_eq!(query.status, StatusFilter::Completed);
        assert_eq!(query.search, "milk");
        assert_eq!(query.sort_by, SortField::UpdatedAt);
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn list_query_rejects_out_of_range_numbers() {
        let errors = validate_list_query(&query_map(&[("page", "0"), ("limit", "101")]))
            .unwrap_err()
            .into_map();
        assert_eq!(errors["page"], "Page must be a positive integer");
        assert_eq!(errors["limit"], "Limit must be between 1 and 100");
    }

    #[test]
    fn list_query_rejects_unrecognized_tokens_instead_of_coercing() {
        let errors = validate_list_query(&query_map(&[
            ("status", "bogus"),
            ("sortBy", "priority"),
            ("order", "ASC"),
        ]))
        .unwrap_err()
        .into_map();

        assert_eq!(errors["status"], "Status must be one of pending, completed, all");
        assert_eq!(errors["sortBy"], "Sort field must be one of createdAt, updatedAt, title");
        assert_eq!(errors["order"], "Order must be either asc or desc");
    }

    #[test]
    fn list_query_rejects_unknown_parameter_names() {
        let errors = validate_list_query(&query_map(&[("pageSize", "5")]))
            .unwrap_err()
            .into_map();
        assert_eq!(errors["pageSize"], "pageSize is not allowed");
    }
}
