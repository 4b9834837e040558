use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Employment state of an employee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Pending,
}

/// Payout channel chosen by the employee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalPreference {
    Bank,
    MobileMoney,
    Crypto,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }
}

impl TryFrom<String> for EmployeeStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            _ => Err(UnknownVariant { kind: "status", value }),
        }
    }
}

impl WithdrawalPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::MobileMoney => "mobile_money",
            Self::Crypto => "crypto",
        }
    }
}

impl TryFrom<String> for WithdrawalPreference {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "bank" => Ok(Self::Bank),
            "mobile_money" => Ok(Self::MobileMoney),
            "crypto" => Ok(Self::Crypto),
            _ => Err(UnknownVariant {
                kind: "withdrawal_preference",
                value,
            }),
        }
    }
}

/// Employee record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Employee {
    pub id: i32,
    pub organization_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub wallet_address: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: EmployeeStatus,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    #[serde(with = "iso_date::option")]
    pub hire_date: Option<Date>,
    #[serde(with = "iso_date::option")]
    pub date_of_birth: Option<Date>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub withdrawal_preference: WithdrawalPreference,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_routing_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub mobile_money_account: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Writable columns of `employees`, in the order statements list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    OrganizationId,
    FirstName,
    LastName,
    Email,
    WalletAddress,
    Status,
    Position,
    Department,
    Phone,
    JobTitle,
    HireDate,
    DateOfBirth,
    AddressLine1,
    AddressLine2,
    City,
    StateProvince,
    PostalCode,
    Country,
    EmergencyContactName,
    EmergencyContactPhone,
    WithdrawalPreference,
    BankName,
    BankAccountNumber,
    BankRoutingNumber,
    MobileMoneyProvider,
    MobileMoneyAccount,
    Notes,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Self::OrganizationId => "organization_id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::WalletAddress => "wallet_address",
            Self::Status => "status",
            Self::Position => "position",
            Self::Department => "department",
            Self::Phone => "phone",
            Self::JobTitle => "job_title",
            Self::HireDate => "hire_date",
            Self::DateOfBirth => "date_of_birth",
            Self::AddressLine1 => "address_line1",
            Self::AddressLine2 => "address_line2",
            Self::City => "city",
            Self::StateProvince => "state_province",
            Self::PostalCode => "postal_code",
            Self::Country => "country",
            Self::EmergencyContactName => "emergency_contact_name",
            Self::EmergencyContactPhone => "emergency_contact_phone",
            Self::WithdrawalPreference => "withdrawal_preference",
            Self::BankName => "bank_name",
            Self::BankAccountNumber => "bank_account_number",
            Self::BankRoutingNumber => "bank_routing_number",
            Self::MobileMoneyProvider => "mobile_money_provider",
            Self::MobileMoneyAccount => "mobile_money_account",
            Self::Notes => "notes",
        }
    }

    /// Postgres type the bound text must be cast to, if any.
    pub fn cast(self) -> Option<&'static str> {
        match self {
            Self::HireDate | Self::DateOfBirth => Some("date"),
            _ => None,
        }
    }
}

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i32),
    Text(String),
}

/// One `column = value` pair destined for an INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: Column,
    pub value: SqlParam,
}

/// Optional attributes shared by create and update inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeProfile {
    pub wallet_address: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub date_of_birth: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub withdrawal_preference: Option<WithdrawalPreference>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_routing_number: Option<String>,
    pub mobile_money_provider: Option<String>,
    pub mobile_money_account: Option<String>,
    pub notes: Option<String>,
}

/// Validated input for a new employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEmployee {
    pub organization_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile: EmployeeProfile,
}

/// Validated partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub profile: EmployeeProfile,
}

fn push_text(out: &mut Vec<Assignment>, column: Column, value: &Option<String>) {
    if let Some(v) = value {
        out.push(Assignment {
            column,
            value: SqlParam::Text(v.clone()),
        });
    }
}

impl EmployeeProfile {
    fn push_assignments(&self, out: &mut Vec<Assignment>) {
        push_text(out, Column::WalletAddress, &self.wallet_address);
        push_text(
            out,
            Column::Status,
            &self.status.map(|s| s.as_str().to_string()),
        );
        push_text(out, Column::Position, &self.position);
        push_text(out, Column::Department, &self.department);
        push_text(out, Column::Phone, &self.phone);
        push_text(out, Column::JobTitle, &self.job_title);
        push_text(out, Column::HireDate, &self.hire_date);
        push_text(out, Column::DateOfBirth, &self.date_of_birth);
        push_text(out, Column::AddressLine1, &self.address_line1);
        push_text(out, Column::AddressLine2, &self.address_line2);
        push_text(out, Column::City, &self.city);
        push_text(out, Column::StateProvince, &self.state_province);
        push_text(out, Column::PostalCode, &self.postal_code);
        push_text(out, Column::Country, &self.country);
        push_text(out, Column::EmergencyContactName, &self.emergency_contact_name);
        push_text(out, Column::EmergencyContactPhone, &self.emergency_contact_phone);
        push_text(
            out,
            Column::WithdrawalPreference,
            &self.withdrawal_preference.map(|w| w.as_str().to_string()),
        );
        push_text(out, Column::BankName, &self.bank_name);
        push_text(out, Column::BankAccountNumber, &self.bank_account_number);
        push_text(out, Column::BankRoutingNumber, &self.bank_routing_number);
        push_text(out, Column::MobileMoneyProvider, &self.mobile_money_provider);
        push_text(out, Column::MobileMoneyAccount, &self.mobile_money_account);
        push_text(out, Column::Notes, &self.notes);
    }
}

impl CreateEmployee {
    /// Required columns first, then whichever optional ones are present.
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = vec![
            Assignment {
                column: Column::OrganizationId,
                value: SqlParam::Int(self.organization_id),
            },
            Assignment {
                column: Column::FirstName,
                value: SqlParam::Text(self.first_name.clone()),
            },
            Assignment {
                column: Column::LastName,
                value: SqlParam::Text(self.last_name.clone()),
            },
            Assignment {
                column: Column::Email,
                value: SqlParam::Text(self.email.clone()),
            },
        ];
        self.profile.push_assignments(&mut out);
        out
    }
}

impl UpdateEmployee {
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = Vec::new();
        push_text(&mut out, Column::FirstName, &self.first_name);
        push_text(&mut out, Column::LastName, &self.last_name);
        push_text(&mut out, Column::Email, &self.email);
        self.profile.push_assignments(&mut out);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.profile == EmployeeProfile::default()
    }
}
