//! Module `commands`
//!
//! Defines the shell command set and the parsing of raw input lines.

use crate::profile::Profile;

pub const USAGE: &str = "\
Commands:
  LOGIN <username> <password>
  SIGNUP <username> <password> <rx_java> <docker> <kotlin>
  LOGOUT
  STATUS
  HELP
  QUIT";

/// A command entered in the shell.
#[derive(Debug, PartialEq)]
pub enum Command {
    Login { username: String, password: String },
    SignUp { profile: Profile, password: String },
    Logout,
    Status,
    Help,
    Quit,
    /// Known command with bad arguments, carrying the reason
    Invalid(String),
    Unknown(String),
}

/// Parses a raw input line into a [`Command`].
///
/// Command names are case-insensitive; arguments are whitespace separated.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "LOGIN" => match args.as_slice() {
            [username, password] => Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => Command::Invalid("usage: LOGIN <username> <password>".into()),
        },
        "SIGNUP" => parse_sign_up(&args),
        "LOGOUT" => Command::Logout,
        "STATUS" => Command::Status,
        "HELP" | "?" => Command::Help,
        "QUIT" | "Q" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn parse_sign_up(args: &[&str]) -> Command {
    let [username, password, rx_java, docker, kotlin] = args else {
        return Command::Invalid(
            "usage: SIGNUP <username> <password> <rx_java> <docker> <kotlin>".into(),
        );
    };

    let skills: Result<Vec<f32>, _> = [rx_java, docker, kotlin]
        .iter()
        .map(|s| s.parse::<f32>())
        .collect();
    let Ok(skills) = skills else {
        return Command::Invalid("skills must be numbers between 0 and 1".into());
    };

    match Profile::new(*username, skills[0], skills[1], skills[2]) {
        Ok(profile) => Command::SignUp {
            profile,
            password: password.to_string(),
        },
        Err(e) => Command::Invalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("LOGOUT"), Command::Logout);
        assert_eq!(parse_command("status"), Command::Status);
        assert_eq!(parse_command("Help"), Command::Help);
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("Q"), Command::Quit);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse_command("login alice s3cret"),
            Command::Login {
                username: "alice".to_string(),
                password: "s3cret".to_string()
            }
        );
        assert!(matches!(parse_command("LOGIN alice"), Command::Invalid(_)));
        assert!(matches!(parse_command("LOGIN a b c"), Command::Invalid(_)));
    }

    #[test]
    fn test_parse_sign_up() {
        assert_eq!(
            parse_command("SIGNUP bob pw 0 0.5 1"),
            Command::SignUp {
                profile: Profile::new("bob", 0.0, 0.5, 1.0).unwrap(),
                password: "pw".to_string()
            }
        );
        assert!(matches!(
            parse_command("SIGNUP bob pw 0 0.5"),
            Command::Invalid(_)
        ));
        assert!(matches!(
            parse_command("SIGNUP bob pw 0 high 1"),
            Command::Invalid(_)
        ));
        assert!(matches!(
            parse_command("SIGNUP bob pw 0 1.5 1"),
            Command::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_command("  LOGOUT  "), Command::Logout);
        assert_eq!(
            parse_command("LOGIN   john    pw  "),
            Command::Login {
                username: "john".to_string(),
                password: "pw".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(
            parse_command("INVALID"),
            Command::Unknown("INVALID".to_string())
        );
        assert_eq!(
            parse_command("FOO bar"),
            Command::Unknown("FOO bar".to_string())
        );
        assert_eq!(parse_command(""), Command::Unknown("".to_string()));
    }
}
