use crate::{
    db::DbPool,
    entities::employees::{self, Entity as Employees, JobPosition},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{performance, performance::PerformanceDelta},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct CreateEmployeeRequest {
    pub region_id: Uuid,
    pub location_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 32))]
    pub phone_number: String,
    pub date_of_hire: NaiveDate,
    pub job_position: JobPosition,
    pub hourly_wage: Decimal,
}

/// A freshly onboarded employee together with the one-time raw password.
/// The raw credential exists only in this return value; the row stores the
/// argon2 hash.
#[derive(Debug, Clone)]
pub struct OnboardedEmployee {
    pub employee: employees::Model,
    pub initial_password: String,
}

/// Derives the account username from the employee's names, phone number and
/// role: first three letters of each name (first two of each when either
/// name is shorter than three), the second-to-last phone digit, and the
/// uppercase role initial. Spaces are stripped; name casing is preserved.
fn derive_username(
    first_name: &str,
    last_name: &str,
    phone_number: &str,
    position: JobPosition,
) -> Result<String, ServiceError> {
    let first: String = first_name.split_whitespace().collect();
    let last: String = last_name.split_whitespace().collect();

    let take = if first.chars().count() < 3 || last.chars().count() < 3 {
        2
    } else {
        3
    };
    let first_part: String = first.chars().take(take).collect();
    let last_part: String = last.chars().take(take).collect();

    let digits: Vec<char> = phone_number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 2 {
        return Err(ServiceError::ValidationError(
            "Phone number must contain at least two digits".into(),
        ));
    }
    let phone_digit = digits[digits.len() - 2];

    Ok(format!(
        "{}{}{}{}",
        first_part,
        last_part,
        phone_digit,
        position.initial()
    ))
}

fn derive_raw_password(username: &str, email: &str) -> String {
    let email_part: String = email.chars().take(3).collect();
    format!("{}@{}", username, email_part)
}

fn hash_password(raw: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))
}

/// Staff onboarding and the request counter. Login credentials are derived
/// exactly once at creation; updates never regenerate them.
#[derive(Clone)]
pub struct EmployeeService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl EmployeeService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(location_id = %request.location_id))]
    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> Result<OnboardedEmployee, ServiceError> {
        request.validate()?;
        if request.hourly_wage <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Hourly wage must be positive".into(),
            ));
        }

        let username = derive_username(
            &request.first_name,
            &request.last_name,
            &request.phone_number,
            request.job_position,
        )?;
        let raw_password = derive_raw_password(&username, &request.email);
        let password_hash = hash_password(&raw_password)?;

        let txn = self.db_pool.begin().await?;

        let employee = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            region_id: Set(request.region_id),
            location_id: Set(request.location_id),
            first_name: Set(request.first_name.clone()),
            last_name: Set(request.last_name.clone()),
            email: Set(request.email.clone()),
            phone_number: Set(request.phone_number.clone()),
            date_of_hire: Set(request.date_of_hire),
            job_position: Set(request.job_position),
            hourly_wage: Set(request.hourly_wage),
            account_username: Set(username),
            account_password: Set(password_hash),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let employee = employee.insert(&txn).await?;

        performance::bootstrap(&txn, employee.id).await?;

        txn.commit().await?;

        info!(employee_id = %employee.id, username = %employee.account_username, "Employee onboarded");
        self.event_sender
            .send(Event::EmployeeCreated(employee.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(OnboardedEmployee {
            employee,
            initial_password: raw_password,
        })
    }

    /// Counts a request created by the employee. The request workflow itself
    /// is collaborator-layer CRUD.
    #[instrument(skip(self))]
    pub async fn record_request(&self, employee_id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        performance::apply_delta(
            &txn,
            employee_id,
            PerformanceDelta {
                requests_created: 1,
                ..Default::default()
            },
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_employee(&self, employee_id: Uuid) -> Result<employees::Model, ServiceError> {
        Employees::find_by_id(employee_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", employee_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_uses_three_letters_of_each_name() {
        let username =
            derive_username("Amelia", "Rodriguez", "555-0187", JobPosition::Waiter).unwrap();
        assert_eq!(username, "AmeRod8W");
    }

    #[test]
    fn short_names_fall_back_to_two_letters() {
        let username = derive_username("Bo", "Chen", "555-0123", JobPosition::Chef).unwrap();
        assert_eq!(username, "BoCh2C");
    }

    #[test]
    fn spaces_in_names_are_stripped() {
        let username =
            derive_username("Mary Jane", "Van Der Berg", "555-0145", JobPosition::Manager).unwrap();
        assert_eq!(username, "MarVan4M");
    }

    #[test]
    fn too_few_phone_digits_is_rejected() {
        assert!(derive_username("Ana", "Silva", "5", JobPosition::Cook).is_err());
    }

    #[test]
    fn raw_password_appends_email_prefix() {
        assert_eq!(
            derive_raw_password("AmeRod8W", "amelia@example.com"),
            "AmeRod8W@ame"
        );
    }
}
