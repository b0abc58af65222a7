use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod dashboard;
mod errors;
mod login;
mod models;
mod store;
mod tracking;

use commands::{Args, Commands, SessionCommand};
use config::Config;
use dashboard::{Dashboard, EditForm, NewUserForm, Screen};
use login::{ADMIN_EMAIL, ADMIN_PASSWORD};
use store::UserStore;
use tracking::{EventSink, spawn_tracker};

/// Applies one session command. Returns `false` when the session should end.
fn dispatch(dashboard: &mut Dashboard, command: SessionCommand) -> bool {
    let feedback = match command {
        SessionCommand::Login { email, password } => dashboard.login(&email, &password),
        SessionCommand::Logout => dashboard.logout(),
        SessionCommand::Welcome => dashboard.show(Screen::Welcome),
        SessionCommand::New {
            name,
            lastname,
            age,
            email,
            password,
        } => dashboard.add_user(NewUserForm {
            name,
            lastname,
            age,
            email,
            password,
        }),
        SessionCommand::List => dashboard.show(Screen::ManageUsers),
        SessionCommand::Edit { id } => dashboard.begin_edit(id),
        SessionCommand::Save {
            name,
            lastname,
            age,
            password,
        } => dashboard.save_edit(EditForm {
            name,
            lastname,
            age,
            password,
        }),
        SessionCommand::CancelEdit => dashboard.cancel_edit(),
        SessionCommand::Delete { id } => dashboard.request_delete(id),
        SessionCommand::Confirm => dashboard.confirm_delete(),
        SessionCommand::CancelDelete => dashboard.cancel_delete(),
        SessionCommand::Quit => return false,
    };

    println!("{}", feedback);
    true
}

fn prompt(dashboard: &Dashboard) -> Result<()> {
    let mut prompt = dashboard.screen().to_string();
    if let Some(id) = dashboard.editing() {
        prompt.push_str(&format!(" edit #{}", id));
    }
    if let Some(id) = dashboard.deleting() {
        prompt.push_str(&format!(" delete #{}?", id));
    }

    let mut stdout = std::io::stdout();
    write!(stdout, "[{}]> ", prompt)?;
    stdout.flush().context("Could not flush stdout")
}

async fn run_session(dashboard: &mut Dashboard) -> Result<()> {
    println!(
        "Log in with: login {} {}  (type help for all commands)",
        ADMIN_EMAIL, ADMIN_PASSWORD
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(dashboard)?;
    while let Some(line) = lines
        .next_line()
        .await
        .context("Could not read from stdin")?
    {
        match SessionCommand::parse_line(&line) {
            Ok(Some(command)) => {
                if !dispatch(dashboard, command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
        prompt(dashboard)?;
    }

    tracing::info!("Session ended with {} users", dashboard.store().len());
    Ok(())
}

fn run_demo(dashboard: &mut Dashboard) {
    const SCRIPT: [&str; 9] = [
        "login admin@example.com admin123",
        "list",
        "new Dana Scully 31 dana@x.com trustno1",
        "delete 2",
        "confirm",
        "new Dana Scully 31 dana@x.com trustno1",
        "edit 1",
        "save --name Alicia --age 29",
        "list",
    ];

    for line in SCRIPT {
        println!("> {}", line);
        match SessionCommand::parse_line(line) {
            Ok(Some(command)) => {
                dispatch(dashboard, command);
            }
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }
    dashboard.logout();
    tracing::info!("Demo finished with {} users", dashboard.store().len());
}

/// Drops the dashboard, and with it the tracking sink, then waits for the
/// tracker to log whatever is still queued.
async fn shutdown(dashboard: Dashboard, tracker: Option<JoinHandle<usize>>) -> Result<usize> {
    drop(dashboard);

    let Some(handle) = tracker else {
        return Ok(0);
    };
    let delivered = handle.await.context("Tracking task failed")?;
    tracing::info!("Tracked {} events", delivered);

    Ok(delivered)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Args::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let store = if config.seed_users && !cli.no_seed {
        UserStore::seeded()
    } else {
        UserStore::new()
    };
    tracing::info!("Starting with {} users", store.len());

    let (tracker, tracker_handle) = if config.tracking {
        let (sink, handle) = spawn_tracker(config.tracking_capacity);
        (Some(Box::new(sink) as Box<dyn EventSink>), Some(handle))
    } else {
        tracing::info!("Event tracking disabled");
        (None, None)
    };
    let mut dashboard = Dashboard::new(store, tracker);

    let outcome = match cli.command {
        Some(Commands::Demo) => {
            run_demo(&mut dashboard);
            Ok(())
        }
        Some(Commands::Run) | None => run_session(&mut dashboard).await,
    };

    // Drain the tracker even when the session failed
    let drained = shutdown(dashboard, tracker_handle).await;
    outcome?;
    drained?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_dashboard() -> Dashboard {
        Dashboard::new(UserStore::seeded(), None)
    }

    fn send(dashboard: &mut Dashboard, line: &str) -> bool {
        let command = SessionCommand::parse_line(line).unwrap().unwrap();
        dispatch(dashboard, command)
    }

    fn ids(dashboard: &Dashboard) -> Vec<u64> {
        dashboard.store().list().iter().map(|u| u.id).collect()
    }

    #[test]
    fn session_lines_drive_the_store() {
        let mut dashboard = seeded_dashboard();

        assert!(send(&mut dashboard, "login admin@example.com admin123"));
        assert!(send(&mut dashboard, "new Dana Scully 31 dana@x.com trustno1"));
        assert!(send(&mut dashboard, "delete 2"));
        assert!(send(&mut dashboard, "confirm"));
        assert!(send(&mut dashboard, "new Dana Scully 31 dana@x.com trustno1"));

        assert_eq!(ids(&dashboard), vec![1, 3, 4]);
        let dana = dashboard.store().find_by_id(4).unwrap();
        assert_eq!(dana.lastname, "Scully");
        assert_eq!(dana.age, 31);
        assert_eq!(dana.password, "trustno1");
    }

    #[test]
    fn save_maps_flags_onto_the_open_edit() {
        let mut dashboard = seeded_dashboard();
        send(&mut dashboard, "login admin@example.com admin123");
        send(&mut dashboard, "edit 2");

        assert!(send(
            &mut dashboard,
            r#"save --name "Bob Lee" --lastname '' --password """#
        ));
        // The empty last name is rejected, so the edit stays open
        assert_eq!(dashboard.editing(), Some(2));
        assert_eq!(dashboard.store().find_by_id(2).unwrap().lastname, "Johnson");

        send(&mut dashboard, r#"save --name "Bob Lee" --age 36 --password """#);
        let bob = dashboard.store().find_by_id(2).unwrap();
        assert_eq!(bob.name, "Bob Lee");
        assert_eq!(bob.age, 36);
        assert_eq!(bob.password, "password123");
        assert_eq!(dashboard.editing(), None);
    }

    #[test]
    fn quit_ends_the_session() {
        let mut dashboard = seeded_dashboard();

        assert!(!send(&mut dashboard, "quit"));
        assert!(!send(&mut dashboard, "exit"));
        assert!(send(&mut dashboard, "logout"));
    }

    #[test]
    fn demo_script_plays_the_scenario() {
        let mut dashboard = seeded_dashboard();

        run_demo(&mut dashboard);

        assert_eq!(ids(&dashboard), vec![1, 3, 4]);
        assert_eq!(dashboard.store().find_by_id(1).unwrap().name, "Alicia");
        assert_eq!(dashboard.store().find_by_id(1).unwrap().age, 29);
        assert_eq!(dashboard.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn shutdown_drains_queued_events() {
        let (sink, handle) = spawn_tracker(8);
        let mut dashboard = Dashboard::new(UserStore::seeded(), Some(Box::new(sink) as Box<dyn EventSink>));
        send(&mut dashboard, "login admin@example.com admin123");
        send(&mut dashboard, "new Dana Scully 31 dana@x.com trustno1");

        assert_eq!(shutdown(dashboard, Some(handle)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn shutdown_without_tracker_is_a_no_op() {
        assert_eq!(shutdown(seeded_dashboard(), None).await.unwrap(), 0);
    }
}
