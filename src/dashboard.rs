use std::fmt;

use crate::errors::StoreError;
use crate::login::{ADMIN_EMAIL, ADMIN_PASSWORD, check_credentials};
use crate::models::{NewUser, UserPatch, parse_age};
use crate::store::UserStore;
use crate::tracking::{EventSink, TrackEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Welcome,
    NewUser,
    ManageUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

/// Message the terminal shows after a dashboard action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub level: Level,
    pub message: String,
}

impl Feedback {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Login => "login",
            Screen::Welcome => "welcome",
            Screen::NewUser => "new-user",
            Screen::ManageUsers => "manage-users",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Success => write!(f, "[ok] {}", self.message),
            Level::Error => write!(f, "[error] {}", self.message),
            Level::Info => write!(f, "{}", self.message),
        }
    }
}

/// Raw contents of the new-user form. Age is still text at this point.
#[derive(Debug, Clone, Default)]
pub struct NewUserForm {
    pub name: String,
    pub lastname: String,
    pub age: String,
    pub email: String,
    pub password: String,
}

/// Fields changed in the edit modal. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct EditForm {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub age: Option<String>,
    pub password: Option<String>,
}

/// Presentation state around an injected `UserStore`. Holds no business rules of
/// its own: it switches screens, tracks which record the modals point at, turns
/// store errors into messages and reports events to the optional sink.
pub struct Dashboard {
    store: UserStore,
    screen: Screen,
    editing: Option<u64>,
    deleting: Option<u64>,
    tracker: Option<Box<dyn EventSink>>,
}

impl Dashboard {
    pub fn new(store: UserStore, tracker: Option<Box<dyn EventSink>>) -> Self {
        Self {
            store,
            screen: Screen::Login,
            editing: None,
            deleting: None,
            tracker,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn deleting(&self) -> Option<u64> {
        self.deleting
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn login(&mut self, email: &str, password: &str) -> Feedback {
        if check_credentials(email, password) {
            tracing::info!("Login succeeded for {}", email);
            self.screen = Screen::Welcome;
            self.track(TrackEvent::LoginSuccessful {
                email: email.to_string(),
            });
            Feedback::success("Welcome to the dashboard!")
        } else {
            tracing::warn!("Login failed for {}", email);
            self.track(TrackEvent::LoginFailed {
                email: email.to_string(),
            });
            Feedback::error(format!(
                "Invalid e-mail or password. Try {} / {}.",
                ADMIN_EMAIL, ADMIN_PASSWORD
            ))
        }
    }

    pub fn logout(&mut self) -> Feedback {
        if self.screen == Screen::Login {
            return Feedback::info("Not logged in.");
        }

        self.screen = Screen::Login;
        self.editing = None;
        self.deleting = None;
        self.track(TrackEvent::Logout);
        tracing::info!("Logged out");
        Feedback::info("Logged out.")
    }

    pub fn show(&mut self, screen: Screen) -> Feedback {
        if screen == Screen::Login {
            return self.logout();
        }
        if let Err(feedback) = self.ensure_logged_in() {
            return feedback;
        }

        self.screen = screen;
        match screen {
            Screen::ManageUsers => Feedback::info(self.render_users_table()),
            Screen::NewUser => {
                Feedback::info("New user: new <name> <lastname> <age> <email> <password>")
            }
            _ => Feedback::info("Welcome! Pick an option: new, list, logout."),
        }
    }

    pub fn add_user(&mut self, form: NewUserForm) -> Feedback {
        if let Err(feedback) = self.ensure_logged_in() {
            return feedback;
        }
        self.screen = Screen::NewUser;

        let candidate = match parse_age(&form.age) {
            Ok(age) => NewUser::new(&form.name, &form.lastname, age, &form.email, &form.password),
            Err(e) => return self.failure(&e),
        };

        match self.store.add(candidate) {
            Ok(user) => {
                self.track(TrackEvent::UserAdded {
                    email: user.email,
                    name: user.name,
                });
                Feedback::success("User registered successfully!")
            }
            Err(e) => self.failure(&e),
        }
    }

    /// Opens the edit modal. The password field always starts blank.
    pub fn begin_edit(&mut self, id: u64) -> Feedback {
        if let Err(feedback) = self.ensure_logged_in() {
            return feedback;
        }

        match self.store.find_by_id(id) {
            Some(user) => {
                let message = format!(
                    "Editing #{}: name={} lastname={} age={} email={} (read-only). \
                     Leave password blank to keep it.",
                    user.id, user.name, user.lastname, user.age, user.email
                );
                self.editing = Some(id);
                Feedback::info(message)
            }
            None => self.failure(&StoreError::NotFound { id }),
        }
    }

    pub fn save_edit(&mut self, form: EditForm) -> Feedback {
        if let Err(feedback) = self.ensure_logged_in() {
            return feedback;
        }
        let Some(id) = self.editing else {
            return Feedback::error("No user is being edited.");
        };

        let age = match form.age.as_deref().map(parse_age).transpose() {
            Ok(age) => age,
            Err(e) => return self.failure(&e),
        };
        let patch = UserPatch {
            name: form.name,
            lastname: form.lastname,
            age,
            password: form.password,
        };

        match self.store.update(id, patch) {
            Ok(user) => {
                self.editing = None;
                self.track(TrackEvent::UserEdited {
                    id: user.id,
                    email: user.email,
                    name: user.name,
                });
                Feedback::success(format!("User #{} updated.", id))
            }
            Err(e @ StoreError::NotFound { .. }) => {
                self.editing = None;
                self.failure(&e)
            }
            // Keep the modal open so the form can be corrected
            Err(e) => self.failure(&e),
        }
    }

    pub fn cancel_edit(&mut self) -> Feedback {
        self.editing = None;
        Feedback::info("Edit cancelled.")
    }

    pub fn request_delete(&mut self, id: u64) -> Feedback {
        if let Err(feedback) = self.ensure_logged_in() {
            return feedback;
        }

        match self.store.find_by_id(id) {
            Some(user) => {
                let message = format!(
                    "Delete {} {} <{}>? Type confirm or cancel-delete.",
                    user.name, user.lastname, user.email
                );
                self.deleting = Some(id);
                Feedback::info(message)
            }
            None => self.failure(&StoreError::NotFound { id }),
        }
    }

    pub fn confirm_delete(&mut self) -> Feedback {
        if let Err(feedback) = self.ensure_logged_in() {
            return feedback;
        }
        let Some(id) = self.deleting.take() else {
            return Feedback::error("No deletion is pending.");
        };

        match self.store.remove(id) {
            Ok(user) => {
                let message = format!("Deleted {} {} <{}>.", user.name, user.lastname, user.email);
                self.track(TrackEvent::UserDeleted {
                    id: user.id,
                    email: user.email,
                    name: user.name,
                });
                Feedback::success(message)
            }
            Err(e) => self.failure(&e),
        }
    }

    pub fn cancel_delete(&mut self) -> Feedback {
        self.deleting = None;
        Feedback::info("Deletion cancelled.")
    }

    pub fn render_users_table(&self) -> String {
        const HEADERS: [&str; 5] = ["Id", "Name", "Last name", "Age", "E-mail"];

        let rows: Vec<[String; 5]> = self
            .store
            .list()
            .iter()
            .map(|u| {
                [
                    u.id.to_string(),
                    u.name.clone(),
                    u.lastname.clone(),
                    u.age.to_string(),
                    u.email.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut table = String::new();
        push_row(&mut table, &HEADERS.map(String::from), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        table.push_str(&rule.join("-+-"));
        table.push('\n');
        for row in &rows {
            push_row(&mut table, row, &widths);
        }
        if self.store.is_empty() {
            table.push_str("(no users)\n");
        }

        table
    }

    fn ensure_logged_in(&self) -> Result<(), Feedback> {
        if self.screen == Screen::Login {
            return Err(Feedback::error("Please log in first."));
        }
        Ok(())
    }

    fn failure(&self, err: &StoreError) -> Feedback {
        tracing::warn!("Dashboard action rejected: {}", err);
        Feedback::error(describe(err))
    }

    fn track(&self, event: TrackEvent) {
        match &self.tracker {
            Some(sink) => sink.track(event),
            None => tracing::debug!("Tracking unavailable, skipped {}", event.name()),
        }
    }
}

fn push_row(table: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    table.push_str(padded.join(" | ").trim_end());
    table.push('\n');
}

fn describe(err: &StoreError) -> String {
    match err {
        StoreError::Validation { .. } => {
            "Please fill in all fields correctly (age must be a valid number).".to_string()
        }
        StoreError::DuplicateEmail { .. } => {
            "E-mail already registered. Please use a different e-mail.".to_string()
        }
        StoreError::NotFound { id } => format!("User #{} does not exist.", id),
    }
}
