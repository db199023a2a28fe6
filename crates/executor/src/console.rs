use common::models::{Direction, ParseEnumError, Timeframe};
use storage::repositories::SignupForm;
use thiserror::Error;

pub const HELP: &str = "\
type to search, an empty line shows popular assets
/login <email>
/signup <name> <email> <password> <confirm>
/logout
/predict <SYMBOL> <up|down> <1d|7d|30d>
/predictions
/stats
/board
/quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Anything that is not a slash command replaces the search query.
    Query(String),
    Login(String),
    Signup(SignupArgs),
    Logout,
    Predict {
        symbol: String,
        direction: Direction,
        timeframe: Timeframe,
    },
    Predictions,
    Stats,
    Board,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupArgs {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl From<SignupArgs> for SignupForm {
    fn from(args: SignupArgs) -> Self {
        SignupForm {
            full_name: args.full_name,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command /{0}, try /help")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Invalid(#[from] ParseEnumError),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Query(line.trim_end_matches(['\r', '\n']).to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = words.collect();

    match (name.as_str(), args.as_slice()) {
        ("login", [email]) => Ok(Command::Login(email.to_string())),
        ("login", _) => Err(CommandError::Usage("/login <email>")),
        ("signup", [full_name, email, password, confirm]) => Ok(Command::Signup(SignupArgs {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        })),
        ("signup", _) => Err(CommandError::Usage(
            "/signup <name> <email> <password> <confirm>",
        )),
        ("logout", []) => Ok(Command::Logout),
        ("predict", [symbol, direction, timeframe]) => Ok(Command::Predict {
            symbol: symbol.to_uppercase(),
            direction: direction.parse()?,
            timeframe: timeframe.parse()?,
        }),
        ("predict", _) => Err(CommandError::Usage(
            "/predict <SYMBOL> <up|down> <1d|7d|30d>",
        )),
        ("predictions", []) => Ok(Command::Predictions),
        ("stats", []) => Ok(Command::Stats),
        ("board", []) => Ok(Command::Board),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", _) => Ok(Command::Quit),
        (other, _) => Err(CommandError::Unknown(other.to_string())),
    }
}
