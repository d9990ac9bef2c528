use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payroll_core::views::employee_list::{CONFIRM_DELETE, DELETE_SUCCEEDED};
use payroll_core::views::{
    route, AdminDashboard, EmployeeField, HrDashboard, LoginView, PayrollField, Screen,
};
use payroll_core::{
    Api, ApiError, AppConfig, PayrollStatus, Session, SessionManager, Storage, StorageError,
    Transport,
};

mod render;
mod store;
#[cfg(test)]
mod testing;
mod transport;

use store::FileStorage;
use transport::UreqTransport;

#[derive(Parser)]
#[command(name = "payroll-console", version, about = "Employee and payroll administration")]
struct Cli {
    /// Overrides EMPLOYEE_SERVICE_URL.
    #[arg(long, global = true)]
    employee_url: Option<String>,

    /// Overrides PAYROLL_SERVICE_URL.
    #[arg(long, global = true)]
    payroll_url: Option<String>,

    /// Where the signed-in session is kept between runs.
    #[arg(
        long,
        env = "PAYROLL_CONSOLE_HOME",
        default_value = ".payroll-console",
        global = true
    )]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in against whichever service accepts the credentials.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "PAYROLL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Print the signed-in user and role.
    Whoami,
    /// Show the dashboard for the signed-in role.
    Dashboard,
    #[command(subcommand)]
    Employees(EmployeeCommand),
    #[command(subcommand)]
    Payroll(PayrollCommand),
}

#[derive(Subcommand)]
enum EmployeeCommand {
    List {
        #[arg(long)]
        department: Option<String>,
    },
    Show {
        code: String,
    },
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        salary: String,
        /// Joining date, YYYY-MM-DD.
        #[arg(long)]
        joined: String,
    },
    /// Delete an employee together with all of their salary records.
    Delete {
        code: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PayrollCommand {
    List {
        #[arg(long)]
        status: Option<PayrollStatus>,
        #[arg(long)]
        employee_id: Option<i64>,
    },
    Create {
        /// Employee code.
        #[arg(long)]
        employee: String,
        /// Pay period, YYYY-MM.
        #[arg(long)]
        period: String,
        /// Defaults to the employee's basic salary.
        #[arg(long)]
        basic: Option<String>,
        #[arg(long, default_value = "0")]
        allowances: String,
        #[arg(long, default_value = "0")]
        deductions: String,
    },
    Status {
        id: i64,
        status: PayrollStatus,
    },
    /// Generate current-month drafts for every employee.
    Bulk,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payroll_console=info,payroll_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.employee_url {
        config.employee_service_url = url;
    }
    if let Some(url) = cli.payroll_url {
        config.payroll_service_url = url;
    }
    tracing::debug!(?config, "configuration loaded");

    let transport = UreqTransport::new(config.api_timeout);
    let mut sessions = open_sessions(&config, &cli.state_dir)?;
    run(cli.command, &config, &transport, &mut sessions)
}

/// Open the session store and restore the saved session. A session file
/// that cannot be read is discarded so the user can sign in again.
fn open_sessions(config: &AppConfig, dir: &Path) -> anyhow::Result<SessionManager<FileStorage>> {
    let storage = match FileStorage::open(dir) {
        Ok(storage) => storage,
        Err(StorageError::Corrupt(reason)) => {
            tracing::warn!(%reason, "discarding unreadable session file");
            FileStorage::reset(dir)?
        }
        Err(e) => return Err(e).with_context(|| format!("opening state in {}", dir.display())),
    };
    tracing::debug!(path = %storage.path().display(), "session store opened");

    let mut sessions = SessionManager::new(config, storage);
    match sessions.restore().map(|session| session.is_some()) {
        Ok(restored) => tracing::debug!(restored, "session restored"),
        Err(StorageError::Corrupt(reason)) => {
            tracing::warn!(%reason, "discarding unreadable session");
            sessions.logout()?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(sessions)
}

fn run<T: Transport + Sync, S: Storage>(
    command: Command,
    config: &AppConfig,
    transport: &T,
    sessions: &mut SessionManager<S>,
) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let mut view = LoginView::new();
            view.username = username;
            view.password = password;
            if view.submit(sessions, transport).is_none() {
                bail!("{}", view.error().unwrap_or("login failed"));
            }
            let session = require_session(sessions)?;
            println!("Signed in as {} ({})", session.username, session.role);
        }
        Command::Logout => {
            sessions.logout()?;
            println!("Signed out");
        }
        Command::Whoami => match sessions.session() {
            Some(session) => println!("{} ({})", session.username, session.role),
            None => println!("Not signed in"),
        },
        Command::Dashboard => {
            let session = require_session(sessions)?;
            let api = Api::new(transport, config, Some(session.token.as_str()));
            match route(Some(&session)) {
                Screen::AdminDashboard => {
                    let dashboard = AdminDashboard::open(&api);
                    check_expired(sessions, dashboard.is_session_expired())?;
                    println!("{}", render::admin_dashboard(&dashboard));
                }
                Screen::HrDashboard => {
                    let dashboard = HrDashboard::open(&api);
                    check_expired(sessions, dashboard.is_session_expired())?;
                    println!("{}", render::hr_dashboard(&dashboard));
                }
                Screen::Login => bail!("Not signed in"),
            }
        }
        Command::Employees(command) => {
            let session = require_session(sessions)?;
            let api = Api::new(transport, config, Some(session.token.as_str()));
            employees(command, &api, sessions)?;
        }
        Command::Payroll(command) => {
            let session = require_session(sessions)?;
            let api = Api::new(transport, config, Some(session.token.as_str()));
            payroll(command, &api, sessions)?;
        }
    }
    Ok(())
}

fn require_session<S: Storage>(sessions: &SessionManager<S>) -> anyhow::Result<Session> {
    sessions
        .session()
        .cloned()
        .ok_or_else(|| anyhow!("Not signed in. Run `payroll-console login` first."))
}

fn check_expired<S: Storage>(sessions: &mut SessionManager<S>, expired: bool) -> anyhow::Result<()> {
    if expired {
        sessions.invalidate()?;
        bail!("Session expired. Please sign in again.");
    }
    Ok(())
}

/// Turn a failed direct call into a console error, dropping the session on
/// 401.
fn api_failure<S: Storage>(sessions: &mut SessionManager<S>, error: ApiError) -> anyhow::Error {
    if matches!(error, ApiError::Unauthorized) {
        if let Err(e) = sessions.invalidate() {
            return e.into();
        }
        return anyhow!("Session expired. Please sign in again.");
    }
    error.into()
}

fn employees<T: Transport + Sync, S: Storage>(
    command: EmployeeCommand,
    api: &Api<'_, T>,
    sessions: &mut SessionManager<S>,
) -> anyhow::Result<()> {
    match command {
        EmployeeCommand::List { department: None } => {
            let dashboard = AdminDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            if let Some(error) = dashboard.error() {
                bail!("{error}");
            }
            println!("{}", render::employee_table(dashboard.employees()));
        }
        EmployeeCommand::List {
            department: Some(department),
        } => {
            let employees = api
                .list_employees_by_department(&department)
                .map_err(|e| api_failure(sessions, e))?;
            println!("{}", render::employee_table(&employees));
        }
        EmployeeCommand::Show { code } => {
            let employee = match api.get_employee_by_code(&code) {
                Ok(employee) => employee,
                Err(ApiError::NotFound) => bail!("No employee with code {code}"),
                Err(e) => return Err(api_failure(sessions, e)),
            };
            println!("{}", render::employee_detail(&employee));
        }
        EmployeeCommand::Create {
            code,
            first_name,
            last_name,
            email,
            department,
            position,
            salary,
            joined,
        } => {
            let mut dashboard = AdminDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            dashboard.toggle_form();
            for (field, value) in [
                (EmployeeField::EmployeeCode, code),
                (EmployeeField::FirstName, first_name),
                (EmployeeField::LastName, last_name),
                (EmployeeField::Email, email),
                (EmployeeField::Department, department),
                (EmployeeField::Position, position),
                (EmployeeField::Salary, salary),
                (EmployeeField::JoiningDate, joined),
            ] {
                dashboard.form.set(field, value);
            }
            dashboard.submit_form(api);

            if dashboard.is_form_visible() {
                for (field, message) in dashboard.form.errors() {
                    eprintln!("  {field:?}: {message}");
                }
                bail!("{}", dashboard.form.alert().unwrap_or("Employee not created"));
            }
            println!("Employee created");
            println!("{}", render::employee_table(dashboard.employees()));
        }
        EmployeeCommand::Delete { code, yes } => {
            let mut dashboard = AdminDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            let Some(id) = dashboard
                .employees()
                .iter()
                .find(|e| e.employee_code == code)
                .map(|e| e.id)
            else {
                bail!("No employee with code {code}");
            };
            if !yes {
                println!("{CONFIRM_DELETE}");
                println!("Re-run with --yes to confirm.");
                return Ok(());
            }
            dashboard.delete(api, id, true);
            match dashboard.list.alert() {
                Some(DELETE_SUCCEEDED) => println!("{DELETE_SUCCEEDED}"),
                alert => bail!("{}", alert.unwrap_or("Employee not deleted")),
            }
        }
    }
    Ok(())
}

fn payroll<T: Transport + Sync, S: Storage>(
    command: PayrollCommand,
    api: &Api<'_, T>,
    sessions: &mut SessionManager<S>,
) -> anyhow::Result<()> {
    match command {
        PayrollCommand::List {
            status: None,
            employee_id: None,
        } => {
            let dashboard = HrDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            if let Some(error) = dashboard.error() {
                bail!("{error}");
            }
            println!("{}", render::payroll_table(dashboard.salaries()));
        }
        PayrollCommand::List {
            status,
            employee_id,
        } => {
            let result = match (status, employee_id) {
                (_, Some(id)) => api.list_salaries_by_employee(id).map(|salaries| {
                    salaries
                        .into_iter()
                        .filter(|s| status.map_or(true, |status| s.status == status))
                        .collect::<Vec<_>>()
                }),
                (Some(status), None) => api.list_salaries_by_status(status),
                (None, None) => api.list_salaries(),
            };
            let salaries = result.map_err(|e| api_failure(sessions, e))?;
            println!("{}", render::payroll_table(&salaries));
        }
        PayrollCommand::Create {
            employee,
            period,
            basic,
            allowances,
            deductions,
        } => {
            let mut dashboard = HrDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            dashboard.toggle_form();
            dashboard.select_employee(&employee);
            if let Some(basic) = basic {
                dashboard.form.set(PayrollField::BasicSalary, basic);
            }
            dashboard.form.set(PayrollField::Allowances, allowances);
            dashboard.form.set(PayrollField::Deductions, deductions);
            dashboard.form.set(PayrollField::PayPeriod, period);

            let summary = dashboard.form.summary();
            if summary.is_visible() {
                println!("{}", render::salary_summary(&summary));
            }
            dashboard.submit_form(api);

            if dashboard.is_form_visible() {
                for (field, message) in dashboard.form.errors() {
                    eprintln!("  {field:?}: {message}");
                }
                bail!("{}", dashboard.form.alert().unwrap_or("Salary not processed"));
            }
            println!("Salary processed");
            println!("{}", render::payroll_table(dashboard.salaries()));
        }
        PayrollCommand::Status { id, status } => {
            let mut dashboard = HrDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            if !dashboard.salaries().iter().any(|s| s.id == id) {
                bail!("No payroll record with id {id}");
            }
            dashboard.update_status(api, id, status);
            if let Some(alert) = dashboard.list.alert() {
                bail!("{alert}");
            }
            println!("Record {id} is now {}", status.display_name());
        }
        PayrollCommand::Bulk => {
            let mut dashboard = HrDashboard::open(api);
            check_expired(sessions, dashboard.is_session_expired())?;
            dashboard.generate_bulk(api);
            if let Some(notice) = dashboard.notice() {
                println!("{notice}");
            }
            if let Some(error) = dashboard.error() {
                bail!("{error}");
            }
            println!("{}", render::payroll_table(dashboard.salaries()));
        }
    }
    Ok(())
}
