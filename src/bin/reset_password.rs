use std::{
    error::Error,
    io::{self},
    path::Path,
    process::exit,
};

use clap::Parser;
use rusqlite::Connection;

use financas_rs::{
    PasswordDigest,
    user::{User, get_user_by_username, set_password},
};

/// A utility for changing the password of a user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The username of the user whose password should be changed.
    #[arg(long)]
    username: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let connection = Connection::open(db_path)?;

    let Some(user) = get_user(&args.username, &connection)? else {
        print_error(format!("No user named \"{}\" in {db_path:#?}.", args.username));
        exit(1);
    };
    println!("Resetting password for {}", user.username);

    let password_digest = match get_new_password_digest() {
        Some(password_digest) => password_digest,
        None => return Ok(()),
    };
    set_password(user.id, &password_digest, &connection)?;

    println!("Password updated successfully!");

    Ok(())
}

fn get_user(username: &str, connection: &Connection) -> Result<Option<User>, financas_rs::Error> {
    println!("Loading user \"{username}\"");

    get_user_by_username(username, connection)
}

fn validate_db_path(db_path: &Path) {
    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

fn get_new_password_digest() -> Option<PasswordDigest> {
    loop {
        println!();

        let first_password = match rpassword::prompt_password("Enter a new password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password.is_empty() {
            print_error("Password cannot be empty, try again.");
            continue;
        }

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Some(PasswordDigest::from_raw_password(&first_password));
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
