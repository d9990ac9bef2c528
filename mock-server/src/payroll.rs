use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    auth::{self, Credentials, TokenResponse, PAYROLL_ACCOUNTS},
    Backend, Failure, PayrollStatus, Salary, Store,
};

const DEFAULT_ALLOWANCE_RATE: f64 = 0.2;
const DEFAULT_DEDUCTION_RATE: f64 = 0.1;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInput {
    #[serde(default)]
    pub employee_code: String,
    pub employee_id: Option<i64>,
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    /// Ignored; the net is always recomputed from the components.
    pub net_salary: Option<f64>,
    pub pay_period: Option<NaiveDate>,
    pub status: Option<PayrollStatus>,
}

pub fn payroll_app(backend: Backend) -> Router {
    let api = Router::new()
        .route("/api/payroll", get(list_salaries).post(create_salary))
        .route("/api/payroll/bulk", post(generate_bulk))
        .route("/api/payroll/employee/{employee_id}", get(list_by_employee))
        .route("/api/payroll/status/{status}", get(list_by_status))
        .route("/api/payroll/{id}/status/{status}", put(update_status))
        .route(
            "/api/payroll/salaries/by-employee/{code}",
            delete(delete_for_employee),
        )
        .route_layer(middleware::from_fn_with_state(
            backend.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/api/auth/login", post(login))
        .merge(api)
        .with_state(backend)
}

async fn login(
    State(backend): State<Backend>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, Failure> {
    auth::login(&backend, PAYROLL_ACCOUNTS, credentials).await
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Create one salary record, filling gaps from the employee record.
/// `today` anchors the default pay period and the two-year window.
fn generate(store: &mut Store, input: SalaryInput, today: NaiveDate) -> Result<Salary, String> {
    let code = input.employee_code.trim().to_string();
    if code.is_empty() {
        return Err("Employee code is required".to_string());
    }
    if let Some(period) = input.pay_period {
        let exists = store
            .salaries
            .values()
            .any(|s| s.employee_code == code && s.pay_period == period);
        if exists {
            return Err(format!(
                "Payroll already exists for employee {code} for period {period}"
            ));
        }
    }

    let employee = store
        .employee_by_code(&code)
        .ok_or_else(|| format!("Employee not found for code: {code}"))?;
    let employee_id = input.employee_id.unwrap_or(employee.id);
    let basic_salary = input
        .basic_salary
        .or(employee.basic_salary)
        .ok_or_else(|| format!("Basic salary is not set for employee {code}"))?;
    let allowances = input
        .allowances
        .unwrap_or(basic_salary * DEFAULT_ALLOWANCE_RATE);
    let deductions = input
        .deductions
        .unwrap_or(basic_salary * DEFAULT_DEDUCTION_RATE);
    let net_salary = basic_salary + allowances - deductions;
    let pay_period = input.pay_period.unwrap_or_else(|| first_of_month(today));

    if let Some(two_years_ago) = today.checked_sub_months(Months::new(24)) {
        if pay_period < two_years_ago {
            return Err("Pay period cannot be older than 2 years".to_string());
        }
    }
    if allowances > basic_salary {
        return Err("Allowances cannot exceed basic salary".to_string());
    }
    if deductions > basic_salary + allowances {
        return Err("Deductions cannot exceed total earnings (basic + allowances)".to_string());
    }

    let salary = Salary {
        id: store.next_salary_id(),
        employee_id,
        employee_code: code,
        basic_salary,
        allowances,
        deductions,
        net_salary,
        pay_period,
        status: input.status.unwrap_or(PayrollStatus::Draft),
        created_at: Local::now().naive_local(),
    };
    store.salaries.insert(salary.id, salary.clone());
    Ok(salary)
}

/// Current-month drafts for every employee. Existing records are skipped;
/// any other failure rolls the whole run back.
fn generate_for_all(store: &mut Store, today: NaiveDate) -> Result<usize, String> {
    let mut scratch = Store {
        employees: store.employees.clone(),
        salaries: store.salaries.clone(),
        next_salary_id: store.next_salary_id,
        ..Store::default()
    };
    let employees: Vec<_> = store.employees.values().cloned().collect();

    let mut processed = 0;
    let mut errors = Vec::new();
    for employee in employees {
        let input = SalaryInput {
            employee_code: employee.employee_code.clone(),
            employee_id: Some(employee.id),
            pay_period: Some(first_of_month(today)),
            ..SalaryInput::default()
        };
        match generate(&mut scratch, input, today) {
            Ok(_) => processed += 1,
            Err(e) if e.contains("already exists") => {
                info!(code = %employee.employee_code, "payroll exists, skipping");
            }
            Err(e) => errors.push(format!(
                "Failed to process employee {}: {e}",
                employee.employee_code
            )),
        }
    }

    if !errors.is_empty() {
        return Err(format!(
            "Bulk payroll generation failed for some employees: {}",
            errors.join("; ")
        ));
    }
    store.salaries = scratch.salaries;
    store.next_salary_id = scratch.next_salary_id;
    Ok(processed)
}

async fn list_salaries(State(backend): State<Backend>) -> Json<Vec<Salary>> {
    Json(backend.read().await.salaries.values().cloned().collect())
}

async fn create_salary(
    State(backend): State<Backend>,
    Json(input): Json<SalaryInput>,
) -> Result<Json<Salary>, Failure> {
    let today = Local::now().date_naive();
    let salary = generate(&mut *backend.write().await, input, today).map_err(|message| {
        warn!(%message, "payroll rejected");
        Failure::BadRequest(message)
    })?;
    info!(id = salary.id, code = %salary.employee_code, "payroll created");
    Ok(Json(salary))
}

/// Answers 200 even when the run fails, with the reason in the text.
async fn generate_bulk(State(backend): State<Backend>) -> String {
    let today = Local::now().date_naive();
    match generate_for_all(&mut *backend.write().await, today) {
        Ok(processed) => {
            info!(processed, "bulk payroll generated");
            "Bulk payroll generation completed successfully (transactional mode)".to_string()
        }
        Err(e) => {
            warn!(error = %e, "bulk payroll rolled back");
            format!("Bulk payroll generation failed: {e}")
        }
    }
}

async fn list_by_employee(
    State(backend): State<Backend>,
    Path(employee_id): Path<i64>,
) -> Json<Vec<Salary>> {
    let store = backend.read().await;
    Json(
        store
            .salaries
            .values()
            .filter(|s| s.employee_id == employee_id)
            .cloned()
            .collect(),
    )
}

async fn list_by_status(
    State(backend): State<Backend>,
    Path(status): Path<PayrollStatus>,
) -> Json<Vec<Salary>> {
    let store = backend.read().await;
    Json(
        store
            .salaries
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect(),
    )
}

/// No transition rules here; any status may follow any other.
async fn update_status(
    State(backend): State<Backend>,
    Path((id, status)): Path<(i64, PayrollStatus)>,
) -> Result<Json<Salary>, Failure> {
    let mut store = backend.write().await;
    let salary = store.salaries.get_mut(&id).ok_or(Failure::NotFound)?;
    salary.status = status;
    info!(id, ?status, "payroll status changed");
    Ok(Json(salary.clone()))
}

async fn delete_for_employee(State(backend): State<Backend>, Path(code): Path<String>) -> String {
    let removed = backend.write().await.remove_salaries_for(&code);
    info!(%code, removed, "salaries deleted");
    format!("Salaries deleted for employee: {code}")
}
