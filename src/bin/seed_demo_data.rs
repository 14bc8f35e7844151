use std::error::Error;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{Username, get_local_today, initialize_db, seed_demo_data};

/// A utility for filling a finance_tracker database with demo categories and transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long)]
    db_path: PathBuf,

    /// The name of the demo user. The user is created if they do not exist.
    #[arg(long, short, default_value = "Maxim")]
    username: String,

    /// The canonical timezone name used to decide what "today" is.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

/// Add six months of demo data for a user.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let username = Username::new(&args.username)?;

    let Some(today) = get_local_today(&args.timezone) else {
        eprintln!("Unknown timezone \"{}\"", args.timezone);
        exit(1);
    };

    println!("Opening database at {:#?}", args.db_path);
    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    println!("Seeding demo data for {username}...");
    let summary = seed_demo_data(username, today, &connection)?;

    println!(
        "User {} now has {} categories and {} transactions.",
        summary.user.id, summary.categories, summary.transactions
    );

    Ok(())
}
