use std::collections::HashMap;

use anyhow::Context;
use kinder_auth::Role;
use kinder_core::AppError;
use kinder_db::{is_unique_violation, violated_constraint};
use kinder_models::directory::{AddEmployeeDto, Employee, EmployeeProfile, UpdateEmployeeDto};
use kinder_models::ids::{EmployeeId, UserId};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::track_identity_registered;
use crate::modules::users::service::UserService;

const EMPLOYEE_COLUMNS: &str = "id, user_id, fname, lname, patronymic, gender, birthday, \
     phone_number, qualification, work_experience, created_at, updated_at";

pub struct EmployeeService;

impl EmployeeService {
    /// Creates the identity and its employee profile in one transaction.
    #[instrument(skip(db, dto), fields(username = %dto.user.username))]
    pub async fn add_employee(
        db: &PgPool,
        dto: AddEmployeeDto,
    ) -> Result<EmployeeProfile, AppError> {
        if let Some(role) = dto.user.role
            && role != Role::Employee
        {
            return Err(AppError::field(
                "user.role",
                format!("Role must be {} for this endpoint", Role::Employee),
            ));
        }

        let mut tx = db.begin().await?;

        let user = UserService::create_identity(
            &mut tx,
            &dto.user.username,
            &dto.user.password,
            Role::Employee,
        )
        .await?;

        let data = dto.employee;
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees (user_id, fname, lname, patronymic, gender, birthday,
                                    phone_number, qualification, work_experience)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(user.id)
        .bind(&data.fname)
        .bind(&data.lname)
        .bind(&data.patronymic)
        .bind(data.gender)
        .bind(data.birthday)
        .bind(data.phone_number)
        .bind(data.qualification)
        .bind(data.work_experience)
        .fetch_one(&mut *tx)
        .await
        .map_err(employee_conflict)?;

        tx.commit().await?;

        track_identity_registered(Role::Employee.as_str());
        Ok(EmployeeProfile { employee, user })
    }

    #[instrument(skip(db))]
    pub async fn list_employees(db: &PgPool) -> Result<Vec<EmployeeProfile>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees ORDER BY lname, fname",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch employees")
        .map_err(AppError::database)?;

        Self::with_users(db, employees).await
    }

    #[instrument(skip(db))]
    pub async fn find_by_user_id(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE user_id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch employee by user")
        .map_err(AppError::database)?;

        Ok(employee)
    }

    #[instrument(skip(db))]
    pub async fn get_employee_by_user(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<EmployeeProfile, AppError> {
        let employee = Self::find_by_user_id(db, user_id).await?.ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("No employee profile for user {}", user_id))
        })?;

        Self::with_user(db, employee).await
    }

    #[instrument(skip(db))]
    pub async fn get_employee(db: &PgPool, id: EmployeeId) -> Result<EmployeeProfile, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch employee")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Employee not found")))?;

        Self::with_user(db, employee).await
    }

    /// Applies the supplied fields; absent ones keep their stored value.
    #[instrument(skip(db, dto))]
    pub async fn update_employee(
        db: &PgPool,
        id: EmployeeId,
        dto: UpdateEmployeeDto,
    ) -> Result<EmployeeProfile, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees SET
                fname = COALESCE($2, fname),
                lname = COALESCE($3, lname),
                patronymic = CASE WHEN $4 THEN $5 ELSE patronymic END,
                gender = COALESCE($6, gender),
                birthday = COALESCE($7, birthday),
                phone_number = COALESCE($8, phone_number),
                qualification = COALESCE($9, qualification),
                work_experience = COALESCE($10, work_experience),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .bind(&dto.fname)
        .bind(&dto.lname)
        .bind(dto.patronymic.is_some())
        .bind(dto.patronymic.clone().flatten())
        .bind(dto.gender)
        .bind(dto.birthday)
        .bind(dto.phone_number)
        .bind(dto.qualification)
        .bind(dto.work_experience)
        .fetch_optional(db)
        .await
        .map_err(employee_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Employee not found")))?;

        Self::with_user(db, employee).await
    }

    async fn with_user(db: &PgPool, employee: Employee) -> Result<EmployeeProfile, AppError> {
        let user = UserService::get_user(db, employee.user_id).await?;
        Ok(EmployeeProfile { employee, user })
    }

    async fn with_users(
        db: &PgPool,
        employees: Vec<Employee>,
    ) -> Result<Vec<EmployeeProfile>, AppError> {
        let user_ids: Vec<UserId> = employees.iter().map(|e| e.user_id).collect();
        let mut users: HashMap<UserId, _> = UserService::get_users_by_ids(db, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        employees
            .into_iter()
            .map(|employee| {
                let user = users.remove(&employee.user_id).ok_or_else(|| {
                    AppError::internal_error(format!(
                        "Employee {} has no identity",
                        employee.id
                    ))
                })?;
                Ok(EmployeeProfile { employee, user })
            })
            .collect()
    }
}

fn employee_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        match violated_constraint(&e) {
            Some("employees_phone_number_key") => {
                return AppError::field(
                    "phone_number",
                    "An employee with this phone number already exists",
                );
            }
            Some("employees_qualification_key") => {
                return AppError::field(
                    "qualification",
                    "An employee with this qualification already exists",
                );
            }
            Some("employees_user_id_key") => {
                return AppError::field("user", "This user already has an employee profile");
            }
            _ => {}
        }
    }
    AppError::from(e)
}
