use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::model::{
    CreateEmployee, EmployeeProfile, EmployeeStatus, UpdateEmployee, WithdrawalPreference,
};

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Field name under which the shared profile is flattened into both schemas.
const PROFILE: &str = "profile";

/// A single rejected field, rendered into the 400 response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: Vec<String>,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(max = 56))]
    pub wallet_address: Option<String>,
    pub status: Option<EmployeeStatus>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub job_title: Option<String>,
    #[validate(regex(path = *DATE_RE))]
    pub hire_date: Option<String>,
    #[validate(regex(path = *DATE_RE))]
    pub date_of_birth: Option<String>,
    #[validate(length(max = 255))]
    pub address_line1: Option<String>,
    #[validate(length(max = 255))]
    pub address_line2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state_province: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 200))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 20))]
    pub emergency_contact_phone: Option<String>,
    pub withdrawal_preference: Option<WithdrawalPreference>,
    #[validate(length(max = 100))]
    pub bank_name: Option<String>,
    #[validate(length(max = 50))]
    pub bank_account_number: Option<String>,
    #[validate(length(max = 50))]
    pub bank_routing_number: Option<String>,
    #[validate(length(max = 50))]
    pub mobile_money_provider: Option<String>,
    #[validate(length(max = 50))]
    pub mobile_money_account: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(required, range(min = 1))]
    pub organization_id: Option<i32>,
    #[validate(required, length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(required, email, length(max = 255))]
    pub email: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileRequest,
}

/// Update body. `organization_id` is deliberately absent: it is ignored if sent.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileRequest,
}

impl From<ProfileRequest> for EmployeeProfile {
    fn from(p: ProfileRequest) -> Self {
        Self {
            wallet_address: p.wallet_address,
            status: p.status,
            position: p.position,
            department: p.department,
            phone: p.phone,
            job_title: p.job_title,
            hire_date: p.hire_date,
            date_of_birth: p.date_of_birth,
            address_line1: p.address_line1,
            address_line2: p.address_line2,
            city: p.city,
            state_province: p.state_province,
            postal_code: p.postal_code,
            country: p.country,
            emergency_contact_name: p.emergency_contact_name,
            emergency_contact_phone: p.emergency_contact_phone,
            withdrawal_preference: p.withdrawal_preference,
            bank_name: p.bank_name,
            bank_account_number: p.bank_account_number,
            bank_routing_number: p.bank_routing_number,
            mobile_money_provider: p.mobile_money_provider,
            mobile_money_account: p.mobile_money_account,
            notes: p.notes,
        }
    }
}

/// Validate a raw create body.
pub fn parse_create(body: Value) -> Result<CreateEmployee, Vec<FieldViolation>> {
    let (req, rejected): (CreateEmployeeRequest, _) = decode(body, &[])?;
    finish(rejected, req.validate())?;

    match (req.organization_id, req.first_name, req.last_name, req.email) {
        (Some(organization_id), Some(first_name), Some(last_name), Some(email)) => {
            Ok(CreateEmployee {
                organization_id,
                first_name,
                last_name,
                email,
                profile: req.profile.into(),
            })
        }
        // `required` already rejected missing fields above
        _ => Err(vec![FieldViolation {
            path: Vec::new(),
            code: "required".into(),
            message: "Required".into(),
        }]),
    }
}

/// Validate a raw partial-update body. `organization_id` is dropped unread.
pub fn parse_update(body: Value) -> Result<UpdateEmployee, Vec<FieldViolation>> {
    let (req, rejected): (UpdateEmployeeRequest, _) = decode(body, &["organization_id"])?;
    finish(rejected, req.validate())?;

    Ok(UpdateEmployee {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        profile: req.profile.into(),
    })
}

const STATUSES: &[&str] = &["active", "inactive", "pending"];
const WITHDRAWAL_PREFERENCES: &[&str] = &["bank", "mobile_money", "crypto"];

/// JSON shape a known body key must have before constraint checks run.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Integer,
    Text,
    OneOf(&'static [&'static str]),
}

fn shape_of(key: &str) -> Option<Shape> {
    match key {
        "organization_id" => Some(Shape::Integer),
        "status" => Some(Shape::OneOf(STATUSES)),
        "withdrawal_preference" => Some(Shape::OneOf(WITHDRAWAL_PREFERENCES)),
        "first_name"
        | "last_name"
        | "email"
        | "wallet_address"
        | "position"
        | "department"
        | "phone"
        | "job_title"
        | "hire_date"
        | "date_of_birth"
        | "address_line1"
        | "address_line2"
        | "city"
        | "state_province"
        | "postal_code"
        | "country"
        | "emergency_contact_name"
        | "emergency_contact_phone"
        | "bank_name"
        | "bank_account_number"
        | "bank_routing_number"
        | "mobile_money_provider"
        | "mobile_money_account"
        | "notes" => Some(Shape::Text),
        _ => None,
    }
}

fn received(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `(code, message)` when `value` does not have the expected shape.
fn mismatch(shape: Shape, value: &Value) -> Option<(&'static str, String)> {
    match (shape, value) {
        (Shape::Text, Value::String(_)) => None,
        (Shape::Integer, Value::Number(n)) if n.is_f64() => {
            Some(("invalid_type", "Expected integer, received float".into()))
        }
        (Shape::Integer, Value::Number(n)) => match n.as_i64().map(i32::try_from) {
            Some(Ok(_)) => None,
            _ => Some(("invalid_type", "Number must fit in a 32-bit integer".into())),
        },
        (Shape::OneOf(allowed), Value::String(s)) if allowed.contains(&s.as_str()) => None,
        (Shape::OneOf(allowed), Value::String(s)) => {
            let expected: Vec<String> = allowed.iter().map(|a| format!("'{a}'")).collect();
            Some((
                "invalid_enum",
                format!(
                    "Invalid enum value. Expected {}, received '{s}'",
                    expected.join(" | ")
                ),
            ))
        }
        (Shape::Integer, other) => Some((
            "invalid_type",
            format!("Expected number, received {}", received(other)),
        )),
        (_, other) => Some((
            "invalid_type",
            format!("Expected string, received {}", received(other)),
        )),
    }
}

/// Strip keys that are ignored or have the wrong shape, then decode the rest.
/// Shape failures come back alongside the request so constraint checks still
/// run on every other field.
fn decode<T: serde::de::DeserializeOwned>(
    body: Value,
    ignored: &[&str],
) -> Result<(T, Vec<FieldViolation>), Vec<FieldViolation>> {
    let Value::Object(mut fields) = body else {
        return Err(vec![FieldViolation {
            path: Vec::new(),
            code: "invalid_type".into(),
            message: "Expected object".into(),
        }]);
    };

    let mut rejected = Vec::new();
    let mut dropped = Vec::new();
    for (key, value) in &fields {
        if ignored.contains(&key.as_str()) {
            dropped.push(key.clone());
            continue;
        }
        let Some(shape) = shape_of(key) else {
            continue;
        };
        if let Some((code, message)) = mismatch(shape, value) {
            rejected.push(FieldViolation {
                path: vec![key.clone()],
                code: code.into(),
                message,
            });
            dropped.push(key.clone());
        }
    }
    for key in &dropped {
        fields.remove(key);
    }

    let req = serde_json::from_value(Value::Object(fields)).map_err(|e| {
        vec![FieldViolation {
            path: Vec::new(),
            code: "invalid_type".into(),
            message: e.to_string(),
        }]
    })?;
    Ok((req, rejected))
}

/// Merge shape failures with constraint failures. A field already rejected
/// for its shape is not reported again (e.g. as `required`).
fn finish(
    mut rejected: Vec<FieldViolation>,
    checked: Result<(), ValidationErrors>,
) -> Result<(), Vec<FieldViolation>> {
    if let Err(errors) = checked {
        let extra: Vec<_> = violations(&errors)
            .into_iter()
            .filter(|v| !rejected.iter().any(|r| r.path == v.path))
            .collect();
        rejected.extend(extra);
    }
    if rejected.is_empty() {
        return Ok(());
    }
    rejected.sort_by(|a, b| a.path.cmp(&b.path));
    Err(rejected)
}

/// Flatten validator output into a path-sorted list. The shared profile is
/// flattened in the JSON body, so its segment is dropped from the path.
fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect(errors, &[], &mut out);
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

fn collect(errors: &ValidationErrors, prefix: &[String], out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let mut path = prefix.to_vec();
                path.push(field.to_string());
                for err in errs {
                    out.push(FieldViolation {
                        path: path.clone(),
                        code: err.code.to_string(),
                        message: message_for(err),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) if field == PROFILE => {
                collect(inner, prefix, out);
            }
            ValidationErrorsKind::Struct(inner) => {
                let mut path = prefix.to_vec();
                path.push(field.to_string());
                collect(inner, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    let mut path = prefix.to_vec();
                    path.push(field.to_string());
                    path.push(idx.to_string());
                    collect(inner, &path, out);
                }
            }
        }
    }
}

fn message_for(err: &ValidationError) -> String {
    if let Some(msg) = &err.message {
        return msg.to_string();
    }
    let bound = |name: &str| err.params.get(name).and_then(|v| v.as_i64());
    match &*err.code {
        "required" => "Required".into(),
        "email" => "Invalid email".into(),
        "regex" => "Expected format YYYY-MM-DD".into(),
        "range" => match bound("min") {
            Some(min) => format!("Must be greater than or equal to {min}"),
            None => "Out of range".into(),
        },
        "length" => {
            let len = err
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|v| v.chars().count() as i64);
            match (len, bound("min"), bound("max")) {
                (Some(len), Some(min), _) if len < min => {
                    format!("Must contain at least {min} character(s)")
                }
                (_, _, Some(max)) => format!("Must contain at most {max} character(s)"),
                _ => "Invalid length".into(),
            }
        }
        other => format!("Invalid value ({other})"),
    }
}
