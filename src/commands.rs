use clap::{Parser, Subcommand, command};
use thiserror::Error;

#[derive(Parser)]
#[command(about = "Demo user-management dashboard")]
pub struct Args {
    /// Start with an empty user list instead of the demo users
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive dashboard session (default)
    Run,
    /// Play the scripted demo scenario and exit
    Demo,
}

#[derive(Error, Debug)]
pub enum LineError {
    #[error("Could not split line: {0}")]
    Quoting(#[from] shell_words::ParseError),

    #[error(transparent)]
    Command(#[from] clap::Error),
}

/// One line typed into the interactive session.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Log in as the dashboard administrator
    Login { email: String, password: String },
    /// Return to the login screen
    Logout,
    /// Show the welcome screen
    Welcome,
    /// Register a new user
    New {
        name: String,
        lastname: String,
        #[arg(allow_hyphen_values = true)]
        age: String,
        email: String,
        password: String,
    },
    /// Show the users table
    List,
    /// Open the edit form for a user
    Edit { id: u64 },
    /// Save the open edit form
    Save {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        lastname: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        age: Option<String>,
        /// Leave out or pass an empty value to keep the current password
        #[arg(long)]
        password: Option<String>,
    },
    /// Close the edit form without saving
    CancelEdit,
    /// Ask to delete a user
    Delete { id: u64 },
    /// Confirm the pending deletion
    Confirm,
    /// Abort the pending deletion
    CancelDelete,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

impl SessionCommand {
    /// Parses a line with shell quoting rules, so `"da Silva"` is one word and
    /// `""` is an empty value. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, LineError> {
        let words = shell_words::split(line)?;
        if words.is_empty() {
            return Ok(None);
        }

        let parsed = SessionLine::try_parse_from(words)?;
        Ok(Some(parsed.command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login() {
        let command = SessionCommand::parse_line("login admin@example.com admin123")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            SessionCommand::Login {
                email: "admin@example.com".to_string(),
                password: "admin123".to_string()
            }
        );
    }

    #[test]
    fn parses_kebab_case_and_alias() {
        assert_eq!(
            SessionCommand::parse_line("cancel-delete").unwrap(),
            Some(SessionCommand::CancelDelete)
        );
        assert_eq!(
            SessionCommand::parse_line("  exit ").unwrap(),
            Some(SessionCommand::Quit)
        );
    }

    #[test]
    fn parses_save_flags() {
        let command = SessionCommand::parse_line("save --name Alicia --age 29").unwrap();
        assert_eq!(
            command,
            Some(SessionCommand::Save {
                name: Some("Alicia".to_string()),
                lastname: None,
                age: Some("29".to_string()),
                password: None,
            })
        );
    }

    #[test]
    fn quoted_values_keep_their_spaces() {
        let command = SessionCommand::parse_line(r#"new "Mary Ann" "da Silva" 30 m@x.com pw"#)
            .unwrap();
        assert_eq!(
            command,
            Some(SessionCommand::New {
                name: "Mary Ann".to_string(),
                lastname: "da Silva".to_string(),
                age: "30".to_string(),
                email: "m@x.com".to_string(),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn empty_quotes_are_empty_values() {
        let command = SessionCommand::parse_line(r#"save --password "" --name ''"#).unwrap();
        assert_eq!(
            command,
            Some(SessionCommand::Save {
                name: Some(String::new()),
                lastname: None,
                age: None,
                password: Some(String::new()),
            })
        );
    }

    #[test]
    fn unbalanced_quote_is_an_error() {
        let err = SessionCommand::parse_line(r#"new "Mary Ann da Silva 30"#).unwrap_err();
        assert!(matches!(err, LineError::Quoting(_)));
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(SessionCommand::parse_line("   ").unwrap(), None);
    }

    #[test]
    fn bad_lines_are_errors() {
        assert!(matches!(
            SessionCommand::parse_line("frobnicate"),
            Err(LineError::Command(_))
        ));
        assert!(SessionCommand::parse_line("edit abc").is_err());
        assert!(SessionCommand::parse_line("new Dana Scully 31").is_err());
    }

    #[test]
    fn program_args_default_to_no_subcommand() {
        let args = Args::try_parse_from(["userdash", "--no-seed"]).unwrap();
        assert!(args.no_seed);
        assert!(args.command.is_none());

        let args = Args::try_parse_from(["userdash", "demo"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Demo)));
    }
}
