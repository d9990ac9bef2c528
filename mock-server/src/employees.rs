use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{self, Credentials, TokenResponse, EMPLOYEE_ACCOUNTS},
    Backend, Employee, Failure, Store,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(default)]
    pub employee_code: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    pub basic_salary: Option<f64>,
    pub join_date: Option<NaiveDate>,
}

pub fn employee_app(backend: Backend) -> Router {
    let api = Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route("/api/employees/bulk", post(create_employees))
        .route("/api/employees/{id}", get(get_employee).delete(delete_employee))
        .route("/api/employees/code/{code}", get(get_by_code))
        .route("/api/employees/department/{department}", get(list_by_department))
        .route("/api/employees/cascade/{code}", delete(cascade_delete))
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
    auth::login(&backend, EMPLOYEE_ACCOUNTS, credentials).await
}

fn insert(store: &mut Store, input: EmployeeInput) -> Result<Employee, Failure> {
    if input.employee_code.trim().is_empty() {
        return Err(Failure::BadRequest("Employee code is required".to_string()));
    }
    if store.employee_by_code(&input.employee_code).is_some() {
        return Err(Failure::BadRequest(format!(
            "Employee code already exists: {}",
            input.employee_code
        )));
    }
    let employee = Employee {
        id: store.next_employee_id(),
        employee_code: input.employee_code,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        department: input.department,
        position: input.position,
        basic_salary: input.basic_salary,
        join_date: input.join_date,
    };
    store.employees.insert(employee.id, employee.clone());
    Ok(employee)
}

async fn list_employees(State(backend): State<Backend>) -> Json<Vec<Employee>> {
    Json(backend.read().await.employees.values().cloned().collect())
}

async fn create_employee(
    State(backend): State<Backend>,
    Json(input): Json<EmployeeInput>,
) -> Result<Json<Employee>, Failure> {
    let employee = insert(&mut *backend.write().await, input)?;
    info!(code = %employee.employee_code, id = employee.id, "employee created");
    Ok(Json(employee))
}

/// All-or-nothing: one bad record rejects the whole batch.
async fn create_employees(
    State(backend): State<Backend>,
    Json(inputs): Json<Vec<EmployeeInput>>,
) -> Result<Json<Vec<Employee>>, Failure> {
    let mut store = backend.write().await;
    let mut scratch = Store {
        employees: store.employees.clone(),
        next_employee_id: store.next_employee_id,
        ..Store::default()
    };
    let created = inputs
        .into_iter()
        .map(|input| insert(&mut scratch, input))
        .collect::<Result<Vec<_>, _>>()?;
    store.employees = scratch.employees;
    store.next_employee_id = scratch.next_employee_id;
    Ok(Json(created))
}

async fn get_employee(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, Failure> {
    let store = backend.read().await;
    store.employees.get(&id).cloned().map(Json).ok_or(Failure::NotFound)
}

async fn get_by_code(
    State(backend): State<Backend>,
    Path(code): Path<String>,
) -> Result<Json<Employee>, Failure> {
    let store = backend.read().await;
    store.employee_by_code(&code).cloned().map(Json).ok_or(Failure::NotFound)
}

async fn list_by_department(
    State(backend): State<Backend>,
    Path(department): Path<String>,
) -> Json<Vec<Employee>> {
    let store = backend.read().await;
    Json(
        store
            .employees
            .values()
            .filter(|e| e.department == department)
            .cloned()
            .collect(),
    )
}

/// Deleting an unknown id still answers 204.
async fn delete_employee(State(backend): State<Backend>, Path(id): Path<i64>) -> StatusCode {
    backend.write().await.employees.remove(&id);
    StatusCode::NO_CONTENT
}

async fn cascade_delete(
    State(backend): State<Backend>,
    Path(code): Path<String>,
) -> Result<String, Failure> {
    let mut store = backend.write().await;
    let id = store.employee_by_code(&code).map(|e| e.id).ok_or(Failure::NotFound)?;
    let salaries = store.remove_salaries_for(&code);
    store.employees.remove(&id);
    info!(%code, salaries, "employee deleted with salaries");
    Ok("Employee and related salaries deleted successfully.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(code: &str) -> EmployeeInput {
        serde_json::from_value(serde_json::json!({
            "employeeCode": code,
            "firstName": "Grace",
            "lastName": "Hopper",
            "basicSalary": 6400.0,
            "joinDate": "2021-09-01"
        }))
        .unwrap()
    }

    #[test]
    fn insert_assigns_ids() {
        let mut store = Store::default();
        let first = insert(&mut store, input("E1")).unwrap();
        let second = insert(&mut store, input("E2")).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.join_date, NaiveDate::from_ymd_opt(2021, 9, 1));
    }

    #[test]
    fn insert_rejects_duplicate_and_blank_codes() {
        let mut store = Store::default();
        insert(&mut store, input("E1")).unwrap();
        assert!(matches!(
            insert(&mut store, input("E1")),
            Err(Failure::BadRequest(m)) if m == "Employee code already exists: E1"
        ));
        assert!(matches!(insert(&mut store, input(" ")), Err(Failure::BadRequest(_))));
    }
}
