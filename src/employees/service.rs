use anyhow::Context;
use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, Postgres},
    query::{Query, QueryAs},
    PgPool,
};
use tracing::debug;

use super::model::{CreateEmployee, Employee, SqlParam, UpdateEmployee};
use super::query::{self, Statement};

/// Persistence boundary for employees. Every lookup is scoped by organization.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn create_employee(&self, input: CreateEmployee) -> anyhow::Result<Employee>;
    async fn get_employee_by_id(
        &self,
        id: i32,
        organization_id: i32,
    ) -> anyhow::Result<Option<Employee>>;
    async fn get_all_employees(&self, organization_id: i32) -> anyhow::Result<Vec<Employee>>;
    async fn update_employee(
        &self,
        id: i32,
        organization_id: i32,
        input: UpdateEmployee,
    ) -> anyhow::Result<Option<Employee>>;
    /// `true` iff a row existed under both keys.
    async fn delete_employee(&self, id: i32, organization_id: i32) -> anyhow::Result<bool>;
}

/// Postgres-backed store. The pool is owned by the caller and injected here.
#[derive(Clone)]
pub struct EmployeeService {
    db: PgPool,
}

impl EmployeeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn bind_as<'q>(stmt: &'q Statement) -> QueryAs<'q, Postgres, Employee, PgArguments> {
    let mut q = sqlx::query_as::<_, Employee>(&stmt.sql);
    for p in &stmt.params {
        q = match p {
            SqlParam::Int(v) => q.bind(*v),
            SqlParam::Text(v) => q.bind(v.as_str()),
        };
    }
    q
}

fn bind<'q>(stmt: &'q Statement) -> Query<'q, Postgres, PgArguments> {
    let mut q = sqlx::query(&stmt.sql);
    for p in &stmt.params {
        q = match p {
            SqlParam::Int(v) => q.bind(*v),
            SqlParam::Text(v) => q.bind(v.as_str()),
        };
    }
    q
}

#[async_trait]
impl EmployeeStore for EmployeeService {
    async fn create_employee(&self, input: CreateEmployee) -> anyhow::Result<Employee> {
        let organization_id = input.organization_id;
        let stmt = query::insert_employee(input.assignments());
        let employee = bind_as(&stmt)
            .fetch_one(&self.db)
            .await
            .context("insert employee")?;
        debug!(organization_id, employee_id = employee.id, "employee created");
        Ok(employee)
    }

    async fn get_employee_by_id(
        &self,
        id: i32,
        organization_id: i32,
    ) -> anyhow::Result<Option<Employee>> {
        let stmt = query::select_employee(id, organization_id);
        let employee = bind_as(&stmt)
            .fetch_optional(&self.db)
            .await
            .context("select employee")?;
        Ok(employee)
    }

    async fn get_all_employees(&self, organization_id: i32) -> anyhow::Result<Vec<Employee>> {
        let stmt = query::select_employees(organization_id);
        let rows = bind_as(&stmt)
            .fetch_all(&self.db)
            .await
            .context("list employees")?;
        debug!(organization_id, count = rows.len(), "employees listed");
        Ok(rows)
    }

    async fn update_employee(
        &self,
        id: i32,
        organization_id: i32,
        input: UpdateEmployee,
    ) -> anyhow::Result<Option<Employee>> {
        let Some(stmt) = query::update_employee(id, organization_id, input.assignments()) else {
            debug!(organization_id, employee_id = id, "empty update, reading current row");
            return self.get_employee_by_id(id, organization_id).await;
        };
        let employee = bind_as(&stmt)
            .fetch_optional(&self.db)
            .await
            .context("update employee")?;
        Ok(employee)
    }

    async fn delete_employee(&self, id: i32, organization_id: i32) -> anyhow::Result<bool> {
        let stmt = query::delete_employee(id, organization_id);
        let result = bind(&stmt)
            .execute(&self.db)
            .await
            .context("delete employee")?;
        debug!(organization_id, employee_id = id, rows = result.rows_affected(), "employee delete");
        Ok(result.rows_affected() == 1)
    }
}
