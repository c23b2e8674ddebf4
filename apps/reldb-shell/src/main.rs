//! Interactive shell for the relational engine.
//!
//! A thin adapter: reads a statement line, forwards it to the engine, prints
//! the result. All correctness logic lives in reldb-core.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use reldb_core::{Database, ExecuteResult};

/// Command-line arguments for the database shell.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file to load on start and save on exit
    #[arg(long, default_value = "reldb.json")]
    data: PathBuf,

    /// Execute a single statement and exit
    #[arg(long)]
    execute: Option<String>,

    /// Suppress the prompt and banner
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt::init();

    let mut db = if args.data.exists() {
        Database::load(&args.data)?
    } else {
        Database::new()
    };

    if let Some(statement) = args.execute {
        run_statement(&mut db, &statement);
        db.save(&args.data)?;
        return Ok(());
    }

    if !args.quiet {
        println!("reldb shell — statements end with ';'");
        println!("meta commands: .save  .tables  .help  .exit");
    }

    let stdin = io::stdin();
    loop {
        if !args.quiet {
            print!("db> ");
            io::stdout().flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line {
            ".exit" | ".quit" => break,
            ".save" => match db.save(&args.data) {
                Ok(()) => println!("saved to {}", args.data.display()),
                Err(e) => eprintln!("error: {}", e),
            },
            ".tables" => {
                for name in db.table_names() {
                    println!("{}", name);
                }
            }
            ".help" => print_help(),
            _ => run_statement(&mut db, line),
        }
    }

    db.save(&args.data)?;
    if !args.quiet {
        println!("saved to {}", args.data.display());
    }
    Ok(())
}

fn run_statement(db: &mut Database, statement: &str) {
    match db.execute(statement) {
        Ok(ExecuteResult::TableCreated(name)) => println!("table '{}' created", name),
        Ok(ExecuteResult::Inserted(row_id)) => println!("inserted 1 row (id {})", row_id),
        Ok(ExecuteResult::Affected(count)) => println!("{} rows affected", count),
        Ok(ExecuteResult::Rows(rows)) => {
            match serde_json::to_string_pretty(&rows) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("error: {}", e),
            }
            println!("{} rows", rows.len());
        }
        Err(e) => eprintln!("error: {}", e),
    }
}

fn print_help() {
    println!("statements:");
    println!("  CREATE TABLE <name> (<col> <type>[, ...]) [PRIMARY KEY(<col>)];");
    println!("  INSERT INTO <name> (<cols>) VALUES (<literals>);");
    println!("  SELECT <*|cols> FROM <name> [JOIN <other> ON a.x = b.y] [WHERE ...];");
    println!("  UPDATE <name> SET <col> = <literal>[, ...] [WHERE ...];");
    println!("  DELETE FROM <name> [WHERE ...];");
    println!("types: int, str, float, bool");
}
