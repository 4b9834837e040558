//! In-memory `EmployeeStore` used by the handler tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use anyhow::Context;
use async_trait::async_trait;
use time::{macros::format_description, Date, OffsetDateTime};

use super::model::{
    CreateEmployee, Employee, EmployeeProfile, EmployeeStatus, UpdateEmployee,
    WithdrawalPreference,
};
use super::service::EmployeeStore;

#[derive(Default)]
pub struct MemoryEmployees {
    rows: Mutex<Vec<Employee>>,
    next_id: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail: bool,
}

impl MemoryEmployees {
    /// A store whose every call fails, as if the database were down.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

fn parse_date(raw: &Option<String>) -> anyhow::Result<Option<Date>> {
    raw.as_deref()
        .map(|s| {
            Date::parse(s, format_description!("[year]-[month]-[day]"))
                .with_context(|| format!("invalid date {s}"))
        })
        .transpose()
}

fn apply(row: &mut Employee, p: &EmployeeProfile) -> anyhow::Result<()> {
    macro_rules! set {
        ($($field:ident),*) => {
            $(if let Some(v) = &p.$field { row.$field = Some(v.clone()); })*
        };
    }
    set!(
        wallet_address,
        position,
        department,
        phone,
        job_title,
        address_line1,
        address_line2,
        city,
        state_province,
        postal_code,
        country,
        emergency_contact_name,
        emergency_contact_phone,
        bank_name,
        bank_account_number,
        bank_routing_number,
        mobile_money_provider,
        mobile_money_account,
        notes
    );
    if let Some(status) = p.status {
        row.status = status;
    }
    if let Some(pref) = p.withdrawal_preference {
        row.withdrawal_preference = pref;
    }
    if p.hire_date.is_some() {
        row.hire_date = parse_date(&p.hire_date)?;
    }
    if p.date_of_birth.is_some() {
        row.date_of_birth = parse_date(&p.date_of_birth)?;
    }
    Ok(())
}

#[async_trait]
impl EmployeeStore for MemoryEmployees {
    async fn create_employee(&self, input: CreateEmployee) -> anyhow::Result<Employee> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.organization_id == input.organization_id && r.email == input.email)
        {
            anyhow::bail!("duplicate key value violates unique constraint");
        }

        let now = OffsetDateTime::now_utc();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let mut row = Employee {
            id,
            organization_id: input.organization_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            wallet_address: None,
            status: EmployeeStatus::Active,
            position: None,
            department: None,
            phone: None,
            job_title: None,
            hire_date: None,
            date_of_birth: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state_province: None,
            postal_code: None,
            country: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            withdrawal_preference: WithdrawalPreference::Crypto,
            bank_name: None,
            bank_account_number: None,
            bank_routing_number: None,
            mobile_money_provider: None,
            mobile_money_account: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut row, &input.profile)?;

        self.writes.fetch_add(1, Ordering::SeqCst);
        rows.push(row.clone());
        Ok(row)
    }

    async fn get_employee_by_id(
        &self,
        id: i32,
        organization_id: i32,
    ) -> anyhow::Result<Option<Employee>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.id == id && r.organization_id == organization_id)
            .cloned())
    }

    async fn get_all_employees(&self, organization_id: i32) -> anyhow::Result<Vec<Employee>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<_> = rows
            .iter()
            .filter(|r| r.organization_id == organization_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(out)
    }

    async fn update_employee(
        &self,
        id: i32,
        organization_id: i32,
        input: UpdateEmployee,
    ) -> anyhow::Result<Option<Employee>> {
        if input.is_empty() {
            return self.get_employee_by_id(id, organization_id).await;
        }
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.id == id && r.organization_id == organization_id)
        else {
            return Ok(None);
        };

        if let Some(v) = input.first_name {
            row.first_name = v;
        }
        if let Some(v) = input.last_name {
            row.last_name = v;
        }
        if let Some(v) = input.email {
            row.email = v;
        }
        apply(row, &input.profile)?;
        row.updated_at = OffsetDateTime::now_utc();

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(row.clone()))
    }

    async fn delete_employee(&self, id: i32, organization_id: i32) -> anyhow::Result<bool> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.organization_id == organization_id));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(rows.len() < before)
    }
}
