mod commands;
mod config;
mod graphql;
mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use platform_gateway::{Gateway, MemoryGateway, RestGateway};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{
    HrServices,
    model::{AttendanceStatus, Department, EmployeeStatus, LeaveStatus, LeaveType},
    seed_hr_demo,
    views::today,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::{AppConfig, GatewayMode},
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-dashboard", version, about = "HR dashboard: employees, attendance and leave")]
struct Cli {
    /// Run against seeded in-memory tables instead of the hosted backend.
    #[arg(
        long,
        global = true,
        env = "HR_DEMO",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    demo: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Print headline counts and the most recent hires.
    Dashboard,
    #[command(subcommand)]
    Employees(EmployeesCommand),
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    #[command(subcommand)]
    Leave(LeaveCommand),
    /// Insert the demo employees, attendance and leave requests.
    Seed,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum EmployeesCommand {
    /// List employees, optionally filtered.
    List {
        /// Case-insensitive match on first name, last name or email.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        department: Option<Department>,
        #[arg(long)]
        status: Option<EmployeeStatus>,
    },
    Show {
        id: Uuid,
    },
    /// Create an employee record.
    Add(AddEmployee),
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub(crate) struct AddEmployee {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub position: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub hire_date: String,
    #[arg(long)]
    pub salary: String,
    #[arg(long, default_value = "active")]
    pub status: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AttendanceCommand {
    /// Attendance for one day, today when no date is given.
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        status: Option<AttendanceStatus>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum LeaveCommand {
    List {
        #[arg(long)]
        status: Option<LeaveStatus>,
        #[arg(long = "type")]
        leave_type: Option<LeaveType>,
    },
    /// Approve a pending request.
    Approve {
        id: Uuid,
        #[arg(long)]
        yes: bool,
    },
    /// Reject a pending request.
    Reject {
        id: Uuid,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let obs = match cli.command {
        Command::Serve(_) => ObsConfig::default(),
        _ => ObsConfig::cli(),
    };
    init_tracing(obs)?;

    let app_config = Arc::new(AppConfig::load(cli.demo)?);
    let services = connect(&app_config).await?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config, services).await,
        Command::Dashboard => commands::dashboard(&services).await,
        Command::Employees(cmd) => commands::employees(&services, cmd).await,
        Command::Attendance(cmd) => commands::attendance(&services, cmd).await,
        Command::Leave(cmd) => commands::leave(&services, cmd).await,
        Command::Seed => commands::seed(&services, app_config.is_demo()).await,
    }
}

/// Build the services over the configured gateway. Demo tables are seeded
/// up front so every command has something to show, with sequential ids so
/// an id printed by one run still resolves in the next.
async fn connect(config: &AppConfig) -> Result<HrServices> {
    match &config.gateway {
        GatewayMode::Remote(settings) => {
            let gateway: Arc<dyn Gateway> = Arc::new(
                RestGateway::new(settings.clone()).context("failed to build gateway client")?,
            );
            Ok(HrServices::new(gateway))
        }
        GatewayMode::Demo => {
            let services = HrServices::new(Arc::new(MemoryGateway::sequential()));
            let seeded = seed_hr_demo(&services, today())
                .await
                .context("failed to seed demo tables")?;
            info!(
                employees = seeded.employees.len(),
                leave_requests = seeded.leave_requests.len(),
                "demo tables seeded"
            );
            Ok(services)
        }
    }
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>, services: HrServices) -> Result<()> {
    let state = AppState {
        schema: graphql::build_schema(services),
        config,
    };
    http::serve(cmd.into(), state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_flag_accepts_boolish_env_values() {
        // Only this test touches HR_DEMO.
        unsafe { std::env::set_var("HR_DEMO", "1") };
        let from_env = Cli::try_parse_from(["hr-dashboard", "dashboard"]);
        unsafe { std::env::set_var("HR_DEMO", "no") };
        let disabled = Cli::try_parse_from(["hr-dashboard", "dashboard"]);
        unsafe { std::env::remove_var("HR_DEMO") };

        assert!(from_env.unwrap().demo);
        assert!(!disabled.unwrap().demo);

        let flagged = Cli::try_parse_from(["hr-dashboard", "leave", "list", "--demo"]).unwrap();
        assert!(flagged.demo);
        let plain = Cli::try_parse_from(["hr-dashboard", "seed"]).unwrap();
        assert!(!plain.demo);
    }
}
