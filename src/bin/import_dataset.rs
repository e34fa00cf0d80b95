use std::{error::Error, fs, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{initialize_db, parse_dataset, replace_all_transactions};

/// Load a transaction dataset from a local JSON file into a sales dashboard database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// File path to a JSON array of transaction records.
    #[arg(long, short)]
    input: String,
}

/// Replace the transactions in a database with the contents of a dataset file.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let input_path = Path::new(&args.input);

    if !input_path.is_file() {
        eprintln!("No dataset file at {input_path:#?}!");
        exit(1);
    }

    println!("Reading dataset from {input_path:#?}");
    let bytes = fs::read(input_path)?;
    let transactions = parse_dataset(&bytes)?;

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let inserted = replace_all_transactions(&transactions, &conn)?;

    println!("Imported {inserted} transactions.");

    Ok(())
}
