//! `tend` - maintenance chores for the service database.
//!
//! Two families of subcommands:
//!
//! - `migrate`: bring every table up to the column set the application
//!   expects. Additive only, idempotent, safe to run on every deploy.
//! - `admin`: inspect, create, or re-key the privileged account.
//!
//! Exit status is zero only when nothing failed: a migration run with
//! any failed column, or an admin lookup that comes up empty, exits
//! non-zero so scripts can react.

mod config;
mod tables;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tend::{AdminAccount, Client, CreateOutcome, MigrationReport, NewAdmin};

#[derive(Parser, Debug)]
#[command(name = "tend", version, about = "Maintenance chores for the service database")]
struct Cli {
    /// Database connection URL (falls back to TEND_DATABASE_URL, then DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Log statement-level detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add any columns the application expects but the database lacks
    Migrate {
        /// Only migrate this table
        #[arg(long)]
        table: Option<String>,

        /// Show what would be added without executing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Privileged-account chores
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    /// Show the admin account, if one exists
    Check,

    /// Create the admin account (refuses if one already exists)
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        password: String,
    },

    /// Reset the password of the account with the given email
    ResetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(url) = config::database_url(cli.database_url.clone()) else {
        eprintln!(
            "{}: no database URL; pass --database-url or set TEND_DATABASE_URL / DATABASE_URL",
            "error".red()
        );
        return ExitCode::FAILURE;
    };

    match run(&cli, &url).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, url: &str) -> tend::Result<ExitCode> {
    tracing::debug!("connecting to {}", config::mask_password(url));
    let client = tend::connect(url).await?;

    match &cli.command {
        Commands::Migrate { table, dry_run } => {
            handle_migrate(&client, table.as_deref(), *dry_run).await
        }
        Commands::Admin { command } => handle_admin(&client, command).await,
    }
}

async fn handle_migrate(
    client: &Client,
    only: Option<&str>,
    dry_run: bool,
) -> tend::Result<ExitCode> {
    let schema = tables::desired_schema();

    if let Some(name) = only {
        if !schema.iter().any(|(table, _)| *table == name) {
            let known: Vec<&str> = schema.iter().map(|(table, _)| *table).collect();
            eprintln!(
                "{}: unknown table {name}; known tables: {}",
                "error".red(),
                known.join(", ")
            );
            return Ok(ExitCode::FAILURE);
        }
    }

    let mut failures = 0usize;

    for (table, desired) in &schema {
        if only.is_some_and(|name| name != *table) {
            continue;
        }

        if dry_run {
            let missing = tend::verify(client, table, desired).await?;
            if missing.is_empty() {
                println!("{}: up to date", table.bold());
            } else {
                println!("{}: would add {}", table.bold(), missing.join(", "));
            }
            continue;
        }

        let report = tend::migrate(client, table, desired).await?;
        print_report(table, &report);
        failures += report.failed.len();

        // Everything desired should exist now, except what just failed.
        let missing = tend::verify(client, table, desired).await?;
        for name in &missing {
            if !report.failed.iter().any(|(spec, _)| &spec.name == name) {
                eprintln!(
                    "{}: {table}.{name} is still missing after the run",
                    "warning".yellow()
                );
            }
        }
    }

    if failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_report(table: &str, report: &MigrationReport) {
    println!("{}:", table.bold());
    for spec in &report.added {
        println!("  {} {}: {}", "+".green(), spec.name, spec.col_type);
    }
    for spec in &report.skipped {
        println!("  {} {} (already present)", "=".dimmed(), spec.name);
    }
    for (spec, err) in &report.failed {
        println!("  {} {}: {}", "!".red(), spec.name, err);
    }
    println!(
        "  {} added, {} skipped, {} failed",
        report.added.len(),
        report.skipped.len(),
        report.failed.len()
    );
}

async fn handle_admin(client: &Client, command: &AdminCommands) -> tend::Result<ExitCode> {
    match command {
        AdminCommands::Check => match tend::find_admin(client).await? {
            Some(account) => {
                println!("{}", "admin account found".green());
                print_account(&account);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                println!("no admin account found");
                println!(
                    "create one with: tend admin create --email ... --phone ... --full-name ... --password ..."
                );
                Ok(ExitCode::FAILURE)
            }
        },

        AdminCommands::Create {
            email,
            phone,
            full_name,
            password,
        } => {
            let new = NewAdmin {
                email: email.clone(),
                phone: phone.clone(),
                full_name: full_name.clone(),
                password: password.clone(),
            };
            match tend::create_admin(client, &new).await? {
                CreateOutcome::Created(account) => {
                    println!("{}", "admin account created".green());
                    print_account(&account);
                    Ok(ExitCode::SUCCESS)
                }
                CreateOutcome::AlreadyExists(account) => {
                    println!(
                        "{}",
                        "an admin account already exists; nothing written".yellow()
                    );
                    print_account(&account);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        AdminCommands::ResetPassword { email, password } => {
            match tend::reset_password(client, email, password).await? {
                Some(account) => {
                    println!("{} for {}", "password reset".green(), account.email);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("{}: no account with email {email}", "error".red());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn print_account(account: &AdminAccount) {
    println!("  email:    {}", account.email);
    println!("  phone:    {}", account.phone);
    println!("  name:     {}", account.full_name);
    println!("  role:     {}", account.role);
    println!("  active:   {}", account.is_active);
    println!("  approved: {}", account.is_approved);
    println!("  created:  {}", account.created_at);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tend=debug" } else { "tend=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
