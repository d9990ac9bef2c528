//! Live mock services for console tests.

use std::time::Duration;

use payroll_core::AppConfig;

/// Start both mock services on random ports and point a config at them.
pub fn start_services() -> AppConfig {
    let bind = || {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        listener
    };
    let employees = bind();
    let payroll = bind();
    let config = AppConfig {
        employee_service_url: format!("http://{}", employees.local_addr().unwrap()),
        payroll_service_url: format!("http://{}", payroll.local_addr().unwrap()),
        api_timeout: Duration::from_secs(5),
    };

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let employees = tokio::net::TcpListener::from_std(employees).unwrap();
            let payroll = tokio::net::TcpListener::from_std(payroll).unwrap();
            mock_server::run(employees, payroll).await
        })
        .unwrap();
    });
    config
}
