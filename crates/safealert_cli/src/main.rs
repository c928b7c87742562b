//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `safealert_core` linkage and print schema details for a database.
//! - Run a deterministic end-to-end demo flow on an in-memory database.
//! - Send an alert from legacy location/photo text, e.g. rows exported by the
//!   old app or a shell trigger.

use clap::{Parser, Subcommand};
use safealert_core::db::migrations::{latest_version, schema_version};
use safealert_core::db::{open_db, open_db_in_memory};
use safealert_core::{
    map_target, AccountService, AlertService, EmergencyAlert, FanOutOutcome, GroupService,
    LocationResult, PhotoResult, Registration, SqliteAlertRepository, SqliteGroupRepository,
    SqliteSessionRepository, SqliteUserRepository,
};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "safealert", version, about = "SafeAlert core smoke runner")]
struct Cli {
    /// SQLite database file to open (created and migrated when missing)
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the register/login/group/alert flow on an in-memory database
    Demo,

    /// Fan an alert out to every group of SENDER in the `--db` database
    Send {
        /// Sender account email
        sender: String,
        /// Location text: "lat, lng" or a legacy status text
        location: String,
        /// Photo path or a legacy status text
        photo: String,
        /// Alert message (defaults to the emergency text)
        #[arg(short, long)]
        message: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    println!("safealert_core ping={}", safealert_core::ping());
    println!("safealert_core version={}", safealert_core::core_version());
    println!("safealert_core schema_latest={}", latest_version());

    if let Some(path) = cli.db.as_deref() {
        describe_db(path)?;
    }

    match cli.command {
        Some(Command::Demo) => run_demo(),
        Some(Command::Send {
            sender,
            location,
            photo,
            message,
        }) => {
            let path = cli.db.as_deref().ok_or("send requires --db")?;
            let mut alert = EmergencyAlert::new(
                LocationResult::from_legacy(&location),
                PhotoResult::from_legacy(&photo),
            );
            if let Some(message) = message {
                alert = alert.with_message(message);
            }
            send_alert(path, &sender, &alert)
        }
        None => Ok(()),
    }
}

fn describe_db(path: &Path) -> Result<(), Box<dyn Error>> {
    let conn = open_db(path)?;
    println!(
        "db path={} schema_version={}",
        path.display(),
        schema_version(&conn)?
    );
    Ok(())
}

fn send_alert(path: &Path, sender: &str, alert: &EmergencyAlert) -> Result<(), Box<dyn Error>> {
    let conn = open_db(path)?;
    let alerts = AlertService::new(
        SqliteGroupRepository::try_new(&conn)?,
        SqliteAlertRepository::try_new(&conn)?,
    );

    let outcome = alerts.send_alert(sender, alert)?;
    println!("send status=\"{}\"", outcome.summary_message());
    if let FanOutOutcome::Delivered(report) = &outcome {
        for failure in &report.failures {
            eprintln!("send failed group={} error={}", failure.group_name, failure.error);
        }
    }
    match map_target(&alert.location) {
        Ok(target) => println!("send map={}", target.browser_url),
        Err(err) => println!("send map=none reason=\"{err}\""),
    }
    Ok(())
}

fn run_demo() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let accounts = AccountService::new(
        SqliteUserRepository::try_new(&conn)?,
        SqliteSessionRepository::try_new(&conn)?,
    );
    let groups = GroupService::new(SqliteGroupRepository::try_new(&conn)?);
    let alerts = AlertService::new(
        SqliteGroupRepository::try_new(&conn)?,
        SqliteAlertRepository::try_new(&conn)?,
    );

    let ana = accounts.register(&Registration::new("Ana", "ana@x.com", "555-1", "pw"))?;
    accounts.login(&ana.email, "pw")?;
    println!("demo login user={}", ana.name);

    groups.create_group(&ana.email, "Family")?;
    groups.add_member(&ana.email, "Family", "bob@x.com")?;
    println!(
        "demo group=Family members={}",
        groups.list_members(&ana.email, "Family")?.join(",")
    );

    let outcome = alerts.send_alert(
        &ana.email,
        &EmergencyAlert::new(
            LocationResult::from_legacy("12.34, 56.78"),
            PhotoResult::from_legacy("/tmp/p.jpg"),
        ),
    )?;
    println!("demo fanout status=\"{}\"", outcome.summary_message());

    for alert in alerts.list_alerts_for_sender(&ana.email)? {
        println!(
            "demo alert id={} group={} location=\"{}\" photo=\"{}\" at={}",
            alert.id, alert.group_name, alert.location, alert.photo, alert.timestamp
        );
    }

    accounts.logout()?;
    Ok(())
}
