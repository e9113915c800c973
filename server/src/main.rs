mod config;
mod graphql;
mod http;
mod views;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use entity::NewEmployee;
use platform_obs::{ObsConfig, init_tracing};
use platform_store::{MemoryStore, StoreBackend, StoreSettings, open_store};
use products_hr::EmployeeRepository;
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hrnet-server", version, about = "HRnet employee records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Add demo employees.
    Seed,
    /// Log every stored employee.
    List,
    /// Remove every stored employee.
    Reset,
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Storage backend (file or memory)")]
    store: Option<StoreBackend>,
    #[arg(long, value_name = "DIR", help = "Directory for the file store")]
    data_dir: Option<PathBuf>,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Seed => run_seed(&app_config.store),
        Command::List => list_employees(&app_config.store),
        Command::Reset => reset_employees(&app_config.store),
        Command::SchemaPrint { output } => schema_print(output),
    }
}

fn open_repository(settings: &StoreSettings) -> Result<Arc<EmployeeRepository>> {
    let store = open_store(settings).with_context(|| {
        format!(
            "failed to open {:?} store at {}",
            settings.backend,
            settings.data_dir.display()
        )
    })?;
    Ok(Arc::new(EmployeeRepository::load(store)))
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let config = Arc::new(config.with_store_overrides(cmd.store, cmd.data_dir.clone()));
    let repository = open_repository(&config.store)?;
    let schema = graphql::build_schema(repository.clone());
    let state = AppState {
        repository,
        schema,
        config,
    };
    http::serve((&cmd).into(), state).await
}

fn run_seed(settings: &StoreSettings) -> Result<()> {
    let repository = open_repository(settings)?;
    for payload in demo_employees() {
        let employee = repository.add_employee(payload);
        info!(employee_id = %employee.id, name = %employee.full_name(), "seeded employee");
    }
    Ok(())
}

fn list_employees(settings: &StoreSettings) -> Result<()> {
    let repository = open_repository(settings)?;
    let employees = repository.current_collection();
    if employees.is_empty() {
        info!("no employees found");
    }
    for employee in employees {
        info!(
            employee_id = %employee.id,
            name = %employee.full_name(),
            department = %employee.department,
            start_date = %employee.start_date,
            "employee"
        );
    }
    Ok(())
}

fn reset_employees(settings: &StoreSettings) -> Result<()> {
    open_repository(settings)?.clear();
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let repository = Arc::new(EmployeeRepository::load(Arc::new(MemoryStore::default())));
    let sdl = graphql::build_schema(repository).sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema snapshot written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

fn demo_employees() -> Vec<NewEmployee> {
    vec![
        NewEmployee {
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: "1990-01-01".into(),
            start_date: "2023-01-01".into(),
            street: "123 Main St".into(),
            city: "New York".into(),
            state: "New York".into(),
            zip_code: "10001".into(),
            department: "Engineering".into(),
        },
        NewEmployee {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            date_of_birth: "1985-05-15".into(),
            start_date: "2022-03-01".into(),
            street: "456 Oak Ave".into(),
            city: "Boston".into(),
            state: "Massachusetts".into(),
            zip_code: "02101".into(),
            department: "Marketing".into(),
        },
    ]
}
