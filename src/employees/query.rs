//! Parameterized statements for the `employees` table.
//!
//! Column names only ever come from [`Column::name`]; request values are
//! always bound as positional parameters.

use super::model::{Assignment, SqlParam};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

fn placeholder(index: usize, assignment: &Assignment) -> String {
    match assignment.column.cast() {
        Some(ty) => format!("${index}::{ty}"),
        None => format!("${index}"),
    }
}

pub fn insert_employee(assignments: Vec<Assignment>) -> Statement {
    let columns = assignments
        .iter()
        .map(|a| a.column.name())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = assignments
        .iter()
        .enumerate()
        .map(|(i, a)| placeholder(i + 1, a))
        .collect::<Vec<_>>()
        .join(", ");

    Statement {
        sql: format!("INSERT INTO employees ({columns}) VALUES ({placeholders}) RETURNING *"),
        params: assignments.into_iter().map(|a| a.value).collect(),
    }
}

pub fn select_employee(id: i32, organization_id: i32) -> Statement {
    Statement {
        sql: "SELECT * FROM employees WHERE id = $1 AND organization_id = $2".into(),
        params: vec![SqlParam::Int(id), SqlParam::Int(organization_id)],
    }
}

pub fn select_employees(organization_id: i32) -> Statement {
    Statement {
        sql: "SELECT * FROM employees WHERE organization_id = $1 ORDER BY created_at DESC".into(),
        params: vec![SqlParam::Int(organization_id)],
    }
}

/// `None` when there is nothing to write.
pub fn update_employee(
    id: i32,
    organization_id: i32,
    assignments: Vec<Assignment>,
) -> Option<Statement> {
    if assignments.is_empty() {
        return None;
    }

    // $1 and $2 are the key
    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{} = {}", a.column.name(), placeholder(i + 3, a)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut params = vec![SqlParam::Int(id), SqlParam::Int(organization_id)];
    params.extend(assignments.into_iter().map(|a| a.value));

    Some(Statement {
        sql: format!(
            "UPDATE employees SET {set_clause}, updated_at = NOW() \
             WHERE id = $1 AND organization_id = $2 RETURNING *"
        ),
        params,
    })
}

pub fn delete_employee(id: i32, organization_id: i32) -> Statement {
    Statement {
        sql: "DELETE FROM employees WHERE id = $1 AND organization_id = $2 RETURNING id".into(),
        params: vec![SqlParam::Int(id), SqlParam::Int(organization_id)],
    }
}
