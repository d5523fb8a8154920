//! polysql: run neutral-dialect SQL against any engine
//!
//! # Usage
//!
//! ```bash
//! # Show what a query becomes on PostgreSQL
//! polysql "SELECT * FROM {users} WHERE id IN ?" --mode postgres --bind '1|2|3' --dry-run
//!
//! # Execute against SQLite
//! polysql "SELECT name FROM t WHERE id = ?id" --named id=4 --database-url sqlite://app.db --mode sqlite
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use polysql::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polysql")]
#[command(version)]
#[command(about = "One query dialect, many engines", long_about = None)]
#[command(after_help = "EXAMPLES:
    polysql 'SELECT * FROM {users} WHERE id IN ?' --bind '1|2' --mode postgres --dry-run
    polysql 'SELECT * FROM t WHERE a = ?a' --named a=one --database-url sqlite::memory: --mode sqlite
    polysql tables --mode mysql --database-url mysql://root@localhost/app")]
struct Cli {
    /// The query to rewrite or execute
    query: Option<String>,

    /// Engine mode: mysql, postgres, sqlite or odbc
    #[arg(short, long, global = true, value_parser = parse_mode)]
    mode: Option<EngineMode>,

    /// Positional bindings; use `|` inside one value to bind a list
    #[arg(short, long, global = true, value_delimiter = ',')]
    bind: Vec<String>,

    /// Named bindings as name=value
    #[arg(short, long, global = true, value_delimiter = ',')]
    named: Vec<String>,

    /// Table catalog entries as table=database
    #[arg(short, long, global = true, value_delimiter = ',')]
    table: Vec<String>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, global = true, env = "POLYSQL_DATABASE_URL")]
    database_url: Option<String>,

    /// Don't execute, just show the rewritten query
    #[arg(short, long)]
    dry_run: bool,

    /// Keep NULL bindings instead of coercing them to ''
    #[arg(long, global = true)]
    allow_nulls: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every output of the rewrite pipeline
    Rewrite {
        query: String,
    },
    /// List tables (or views) in a database
    Tables {
        database: Option<String>,
        #[arg(long)]
        views: bool,
    },
    /// List databases
    Databases,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "polysql=debug" } else { "polysql=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Some(Commands::Rewrite { query }) => show_rewrite(query, &params(cli)?, &config),
        Some(Commands::Tables { database, views }) => {
            let mut sql = connect(config)?;
            let names = if *views {
                sql.list_views(database.as_deref())?
            } else {
                sql.list_tables(database.as_deref())?
            };
            print_names(&names);
            Ok(())
        }
        Some(Commands::Databases) => {
            let mut sql = connect(config)?;
            print_names(&sql.list_databases()?);
            Ok(())
        }
        None => match &cli.query {
            Some(query) if cli.dry_run || config.url.is_empty() => {
                show_rewrite(query, &params(cli)?, &config)?;
                if config.url.is_empty() && !cli.dry_run {
                    println!();
                    println!(
                        "{}",
                        "⚠ No database URL. Use --database-url or set POLYSQL_DATABASE_URL".yellow()
                    );
                }
                Ok(())
            }
            Some(query) => execute(query, cli, config),
            None => {
                println!("{}", "polysql: one query dialect, many engines".cyan().bold());
                println!();
                println!("Usage: polysql <QUERY> [OPTIONS]");
                println!();
                println!("Try: polysql --help");
                Ok(())
            }
        },
    }
}

fn load_config(cli: &Cli) -> Result<SqlConfig> {
    let mut config = match &cli.config {
        Some(path) => SqlConfig::load(path)?,
        None => SqlConfig::new(EngineMode::default(), ""),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(url) = &cli.database_url {
        config.url = url.clone();
    }
    if cli.allow_nulls {
        config.allow_nulls = true;
    }
    if config.log_dir.is_none() {
        config.log_dir = dirs::cache_dir().map(|dir| dir.join("polysql"));
    }

    for entry in &cli.table {
        let (table, database) = entry
            .split_once('=')
            .with_context(|| format!("--table expects name=database, got '{}'", entry))?;
        let tables = std::mem::take(&mut config.tables);
        config.tables = tables.with_table(table.trim(), database.trim());
    }
    Ok(config)
}

fn connect(config: SqlConfig) -> Result<Sql> {
    if config.url.is_empty() {
        anyhow::bail!("No database URL. Use --database-url or set POLYSQL_DATABASE_URL");
    }
    Ok(Sql::new(config)?)
}

fn params(cli: &Cli) -> Result<Params> {
    let mut params = Params::new();
    for binding in &cli.bind {
        params = params.push(parse_binding(binding));
    }
    for entry in &cli.named {
        let (name, value) = entry
            .split_once('=')
            .with_context(|| format!("--named expects name=value, got '{}'", entry))?;
        params = params.named(name.trim(), parse_binding(value));
    }
    Ok(params)
}

fn parse_mode(s: &str) -> Result<EngineMode, String> {
    s.parse().map_err(|e: SqlError| e.to_string())
}

/// `a|b|c` binds a list; anything else binds one scalar.
fn parse_binding(binding: &str) -> Param {
    if binding.contains('|') {
        Param::List(binding.split('|').map(parse_scalar).collect())
    } else {
        Param::Value(parse_scalar(binding))
    }
}

fn parse_scalar(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        Value::Null
    } else if let Ok(n) = raw.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Float(f)
    } else if raw == "true" {
        Value::Bool(true)
    } else if raw == "false" {
        Value::Bool(false)
    } else {
        Value::String(raw.to_string())
    }
}

fn show_rewrite(query: &str, params: &Params, config: &SqlConfig) -> Result<()> {
    let rewritten = Rewriter::new(config.mode, &config.tables)
        .allow_nulls(config.allow_nulls)
        .rewrite(query, params.clone())?;

    println!("{} {}", "Mode:".dimmed(), config.mode.to_string().cyan());
    println!("{}", "Native query:".green().bold());
    println!("  {}", rewritten.query.white());

    if !rewritten.params.is_empty() {
        println!("{}", "Parameters:".cyan());
        for (i, value) in rewritten.params.iter().enumerate() {
            println!("  {} = {}", config.mode.dialect().placeholder(i + 1), value.to_string().yellow());
        }
    }

    println!("{}", "Prepared:".green().bold());
    println!("  {}", rewritten.prepared.white());
    Ok(())
}

fn execute(query: &str, cli: &Cli, config: SqlConfig) -> Result<()> {
    if cli.verbose {
        println!("{} {}", "Input:".dimmed(), query.yellow());
    }
    let mut sql = connect(config)?;
    let mut result = sql.query(query, params(cli)?)?;

    if result.column_count() == 0 {
        println!("{} {} rows affected", "✓".green(), result.affected_rows());
        return Ok(());
    }

    let columns: Vec<String> = result.columns().iter().map(|c| c.to_lowercase()).collect();
    let rows = result.fetch_all_assoc()?;
    format_output(&columns, &rows, &cli.format);
    Ok(())
}

fn format_output(columns: &[String], rows: &[HashMap<String, Value>], format: &OutputFormat) {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).unwrap_or_default());
        }
        OutputFormat::Table => {
            let widths: Vec<usize> = columns
                .iter()
                .map(|col| {
                    rows.iter()
                        .filter_map(|row| row.get(col))
                        .map(|v| v.to_string().len())
                        .fold(col.len(), usize::max)
                })
                .collect();

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in rows {
                let cells: Vec<String> = columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| {
                        let val = row.get(c).map(Value::to_string).unwrap_or_default();
                        format!("{:width$}", val, width = *w)
                    })
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", rows.len().to_string().cyan());
        }
    }
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("{}", "(none)".dimmed());
        return;
    }
    for name in names {
        println!("  • {}", name.white());
    }
}
