//! Plain-text rendering of the view state.

use std::fmt::Write;

use payroll_core::format::{format_currency, format_optional_currency, or_na, short_date};
use payroll_core::views::employee_list::EmployeeRow;
use payroll_core::views::payroll_list::PayrollRow;
use payroll_core::views::{AdminDashboard, EmployeeList, HrDashboard, PayrollList, SalarySummary};
use payroll_core::Employee;

fn line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Left-aligned columns sized to the widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();

    let mut out = line(headers, &widths);
    out.push('\n');
    out.push_str(&line(&rule, &widths));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push('\n');
        out.push_str(&line(&cells, &widths));
    }
    out
}

fn employee_cells(row: &EmployeeRow) -> Vec<String> {
    vec![
        row.code.clone(),
        row.name.clone(),
        row.email.clone(),
        row.department.clone(),
        row.position.clone(),
        row.salary.clone(),
        row.joined.clone(),
    ]
}

fn payroll_cells(row: &PayrollRow) -> Vec<String> {
    vec![
        row.id.to_string(),
        row.employee_code.clone(),
        row.period.clone(),
        row.basic_salary.clone(),
        row.allowances.clone(),
        row.deductions.clone(),
        row.net_salary.clone(),
        row.status.display_name().to_string(),
        row.actions_text(),
    ]
}

pub fn employee_table(employees: &[Employee]) -> String {
    let rows: Vec<_> = EmployeeList::rows(employees).iter().map(employee_cells).collect();
    format!(
        "{}\n{}",
        EmployeeList::heading(employees),
        table(
            &["Code", "Name", "Email", "Department", "Position", "Salary", "Joined"],
            &rows
        )
    )
}

pub fn payroll_table(salaries: &[payroll_core::Salary]) -> String {
    let rows: Vec<_> = PayrollList::rows(salaries).iter().map(payroll_cells).collect();
    format!(
        "{}\n{}",
        PayrollList::heading(salaries),
        table(
            &["ID", "Employee", "Period", "Basic", "Allowances", "Deductions", "Net", "Status", "Actions"],
            &rows
        )
    )
}

pub fn employee_detail(employee: &Employee) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", employee.full_name(), employee.employee_code);
    let _ = writeln!(out, "  Email:      {}", or_na(&employee.email));
    let _ = writeln!(out, "  Department: {}", or_na(&employee.department));
    let _ = writeln!(out, "  Position:   {}", or_na(&employee.position));
    let _ = writeln!(out, "  Salary:     {}", format_optional_currency(employee.basic_salary));
    let joined = employee
        .join_date
        .as_deref()
        .map(short_date)
        .unwrap_or_else(|| "N/A".to_string());
    let _ = write!(out, "  Joined:     {joined}");
    out
}

pub fn admin_dashboard(dashboard: &AdminDashboard) -> String {
    let stats = dashboard.stats();
    let mut out = String::from("Employee Management\n");
    let _ = writeln!(
        out,
        "Total Employees: {}   Departments: {}",
        stats.total_employees, stats.departments
    );
    if let Some(error) = dashboard.error() {
        let _ = writeln!(out, "! {error}");
    }
    out.push('\n');
    out.push_str(&employee_table(dashboard.employees()));
    out
}

pub fn hr_dashboard(dashboard: &HrDashboard) -> String {
    let totals = dashboard.totals();
    let mut out = String::from("Payroll Management\n");
    let _ = writeln!(
        out,
        "Total Records: {}   Draft: {}   Paid: {}   Total Amount: {}",
        totals.total_records,
        totals.draft,
        totals.paid,
        totals.total_amount_label()
    );
    if let Some(error) = dashboard.error() {
        let _ = writeln!(out, "! {error}");
    }
    out.push('\n');
    out.push_str(&payroll_table(dashboard.salaries()));
    out
}

pub fn salary_summary(summary: &SalarySummary) -> String {
    format!(
        "Basic {} + Allowances {} - Deductions {} = Net {}",
        format_currency(summary.basic_salary),
        format_currency(summary.allowances),
        format_currency(summary.deductions),
        format_currency(summary.net_salary)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns() {
        let out = table(
            &["Code", "Name"],
            &[vec!["E1".to_string(), "Ada Lovelace".to_string()]],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Code  Name");
        assert_eq!(lines[1], "----  ------------");
        assert_eq!(lines[2], "E1    Ada Lovelace");
    }

    #[test]
    fn summary_line() {
        let summary = SalarySummary {
            basic_salary: 4000.0,
            allowances: 500.0,
            deductions: 250.5,
            net_salary: 4249.5,
        };
        assert_eq!(
            salary_summary(&summary),
            "Basic $4,000 + Allowances $500 - Deductions $250.5 = Net $4,249.5"
        );
    }
}
