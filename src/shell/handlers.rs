//! Command handlers for the session shell.
//!
//! Turns parsed commands into session client calls and renders states and
//! failure events as user-facing lines.

use crate::error::{Operation, describe};
use crate::session::{LoginFailed, SessionClient, SessionState, SignUpFailed};
use crate::shell::commands::{Command, USAGE};

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Continue,
    Quit,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    fn silent() -> Self {
        Self {
            status: CommandStatus::Continue,
            message: None,
        }
    }

    fn reply(message: String) -> Self {
        Self {
            status: CommandStatus::Continue,
            message: Some(message),
        }
    }
}

/// Dispatches a parsed command to the session client.
///
/// Login and sign-up only start the operation; their outcome shows up later
/// on the state stream and the failure streams.
pub fn handle_command(client: &mut SessionClient, command: Command) -> CommandResult {
    match command {
        Command::Login { username, password } => {
            client.login(username, password);
            CommandResult::silent()
        }
        Command::SignUp { profile, password } => {
            client.sign_up(profile, password);
            CommandResult::silent()
        }
        Command::Logout => {
            client.logout();
            CommandResult::silent()
        }
        Command::Status => CommandResult::reply(render_status(&client.current_state())),
        Command::Help => CommandResult::reply(USAGE.to_string()),
        Command::Quit => CommandResult {
            status: CommandStatus::Quit,
            message: Some("Goodbye".into()),
        },
        Command::Invalid(reason) => CommandResult::reply(format!("Invalid command: {}", reason)),
        Command::Unknown(raw) if raw.is_empty() => CommandResult::silent(),
        Command::Unknown(raw) => {
            CommandResult::reply(format!("Unknown command: {} (type HELP)", raw))
        }
    }
}

/// One-line rendering of a state change.
pub fn render_state(state: &SessionState) -> String {
    match state {
        SessionState::LoggedOut => "[logged out]".to_string(),
        SessionState::LoggingIn => "[logging in...]".to_string(),
        SessionState::SigningUp => "[signing up...]".to_string(),
        SessionState::LoggedIn(profile) => format!("[logged in as {}]", profile.username),
    }
}

/// Detailed rendering for the STATUS command.
pub fn render_status(state: &SessionState) -> String {
    match state {
        SessionState::LoggedIn(profile) => format!(
            "Logged in as {}\n  RxJava: {:.0}%\n  Docker: {:.0}%\n  Kotlin: {:.0}%",
            profile.username,
            profile.skill_rx_java * 100.0,
            profile.skill_docker * 100.0,
            profile.skill_kotlin * 100.0
        ),
        other => format!("Status: {}", other),
    }
}

pub fn render_login_failure(event: &LoginFailed) -> String {
    format!(
        "Error logging in as {}: {}",
        event.username,
        describe(event.error, Operation::Login)
    )
}

pub fn render_sign_up_failure(event: &SignUpFailed) -> String {
    format!(
        "Error signing up as {}: {}",
        event.profile.username,
        describe(event.error, Operation::SignUp)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::profile::Profile;
    use crate::service::MemoryIdentityService;
    use crate::shell::commands::parse_command;
    use crate::store::MemoryTokenStore;
    use std::sync::Arc;

    fn client() -> SessionClient {
        SessionClient::new(
            MemoryTokenStore::new(),
            Arc::new(MemoryIdentityService::new()),
        )
    }

    #[tokio::test]
    async fn test_login_starts_operation() {
        let mut client = client();
        let result = handle_command(&mut client, parse_command("LOGIN alice pw"));
        assert_eq!(result.status, CommandStatus::Continue);
        assert!(result.message.is_none());
        assert_eq!(client.current_state(), SessionState::LoggingIn);
    }

    #[tokio::test]
    async fn test_quit_and_status() {
        let mut client = client();
        let status = handle_command(&mut client, Command::Status);
        assert_eq!(status.message.as_deref(), Some("Status: logged out"));

        let quit = handle_command(&mut client, Command::Quit);
        assert_eq!(quit.status, CommandStatus::Quit);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_input() {
        let mut client = client();
        let unknown = handle_command(&mut client, parse_command("DANCE"));
        assert!(unknown.message.unwrap().contains("Unknown command"));

        let empty = handle_command(&mut client, parse_command("   "));
        assert!(empty.message.is_none());
    }

    #[test]
    fn test_render_status_logged_in() {
        let profile = Profile::new("alice", 0.0, 0.5, 1.0).unwrap();
        let rendered = render_status(&SessionState::LoggedIn(profile));
        assert!(rendered.starts_with("Logged in as alice"));
        assert!(rendered.contains("Docker: 50%"));
        assert!(rendered.contains("Kotlin: 100%"));
    }

    #[test]
    fn test_render_failures() {
        let login = LoginFailed {
            username: "bob".into(),
            password: "pw".into(),
            error: ClientError::Unauthorized,
        };
        assert_eq!(
            render_login_failure(&login),
            "Error logging in as bob: Invalid username or password."
        );

        let sign_up = SignUpFailed {
            profile: Profile::new("bob", 0.1, 0.2, 0.3).unwrap(),
            password: "pw".into(),
            error: ClientError::UsernameUnavailable,
        };
        assert!(render_sign_up_failure(&sign_up).contains("already taken"));
    }
}
