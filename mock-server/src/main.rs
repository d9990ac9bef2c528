use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let employee_port = std::env::var("EMPLOYEE_PORT").unwrap_or_else(|_| "8081".to_string());
    let payroll_port = std::env::var("PAYROLL_PORT").unwrap_or_else(|_| "8082".to_string());

    let employee_addr = format!("127.0.0.1:{employee_port}");
    let payroll_addr = format!("127.0.0.1:{payroll_port}");
    let employee_listener = TcpListener::bind(&employee_addr).await?;
    let payroll_listener = TcpListener::bind(&payroll_addr).await?;
    tracing::info!(%employee_addr, %payroll_addr, "mock services listening");

    mock_server::run(employee_listener, payroll_listener).await
}
