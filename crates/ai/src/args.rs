//! Parsing logic of command-line arguments.

use {
    crate::logging::LogMode,
    clap::{
        Parser,
        builder::NonEmptyStringValueParser,
        error::{ContextKind, ContextValue, ErrorKind},
    },
    std::{
        ffi::OsString,
        fmt,
        io::{self, Write},
        time::Duration,
    },
};

/// The usage message printed when help is requested or when the arguments are invalid.
pub const USAGE: &str = "\
USAGE: ./zappy_ai -p port -n name --host machine
  -p port       : port number
  -n name       : name of the team
  -h machine: name of the machine; localhost by default
";

/// The port used when `-p` is not provided.
pub const DEFAULT_PORT: u16 = 4242;
/// The host used when `-h` is not provided.
pub const DEFAULT_HOST: &str = "localhost";
/// The number of times the client attempts to connect before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 10;
/// The time the client waits between two connection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(5000);

/// The exit code of the program when the arguments are invalid.
pub const ERROR_EXIT_CODE: u8 = 84;

/// The raw command-line arguments, as understood by `clap`.
///
/// Note that `-h` is the host, not the help flag. Help is only available through `--help`.
#[derive(Debug, Clone, Parser)]
#[clap(
    name = "zappy_ai",
    no_binary_name = true,
    disable_help_flag = true,
    args_override_self = true
)]
struct Args {
    /// The port number of the Zappy server to connect to.
    #[clap(
        short = 'p',
        long = "port",
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    port: u16,
    /// Name of the team the AI is playing for.
    #[clap(short = 'n', long = "name", value_parser = NonEmptyStringValueParser::new())]
    name: String,
    /// The hostname of the Zappy server to connect to.
    #[clap(
        short = 'h',
        long = "host",
        default_value = DEFAULT_HOST,
        value_parser = NonEmptyStringValueParser::new(),
    )]
    host: String,
    /// Print help.
    #[clap(long = "help")]
    help: bool,
    /// Where log records are written.
    #[clap(long = "log-mode", value_enum, default_value_t = LogMode::Console)]
    log_mode: LogMode,
}

/// The validated configuration of the AI client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The port number of the Zappy server.
    ///
    /// Passed using the `-p` or `--port` flag.
    ///
    /// **Default:** `4242`
    pub port: u16,
    /// The name of the team the AI is playing for. Never empty.
    ///
    /// Passed using the `-n` or `--name` flag. This flag is required.
    pub name: String,
    /// The hostname of the Zappy server.
    ///
    /// Passed using the `-h` or `--host` flag.
    ///
    /// **Default:** `localhost`
    pub host: String,
    /// The number of connection attempts made before giving up.
    pub max_retries: u32,
    /// The delay between two connection attempts.
    pub retry_delay: Duration,
    /// Where log records are written.
    ///
    /// Passed using the `--log-mode` flag.
    ///
    /// **Default:** `console`
    pub log_mode: LogMode,
}

impl From<Args> for Configuration {
    fn from(args: Args) -> Self {
        Self {
            port: args.port,
            name: args.name,
            host: args.host,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            log_mode: args.log_mode,
        }
    }
}

/// An error that can occur while parsing the command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required flag was not passed.
    MissingRequiredField(String),
    /// A flag was passed without a value.
    MissingValue(String),
    /// A flag was passed with a value that does not fit its type.
    InvalidValue {
        /// The flag that received the value.
        flag: String,
        /// The rejected value.
        value: String,
    },
    /// An unknown flag or an unexpected positional argument was passed.
    UnrecognizedArgument(String),
    /// The arguments could not be understood at all.
    Malformed(&'static str),
}

impl Error {
    /// Converts a `clap` error into our own representation, so that `clap`'s rendering is never
    /// shown to the user.
    ///
    /// `args` are the arguments that were given to `clap`.
    fn from_clap(err: &clap::Error, args: &[OsString]) -> Self {
        let arg = context(err, ContextKind::InvalidArg);
        let value = context(err, ContextKind::InvalidValue);

        match err.kind() {
            ErrorKind::MissingRequiredArgument => Self::MissingRequiredField(arg),
            ErrorKind::InvalidValue | ErrorKind::ValueValidation if value.is_empty() => {
                Self::MissingValue(arg)
            }
            ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
                Self::InvalidValue { flag: arg, value }
            }
            ErrorKind::UnknownArgument => Self::unrecognized(arg, args),
            // e.g. `--help=true`, a value attached to a flag that takes none.
            _ if !arg.is_empty() && !value.is_empty() => Self::InvalidValue { flag: arg, value },
            _ if !arg.is_empty() => Self::unrecognized(arg, args),
            kind => Self::Malformed(kind.as_str().unwrap_or("malformed arguments")),
        }
    }

    /// Builds the error for an argument `clap` did not recognize.
    ///
    /// `clap` never takes a token starting with `-` as the value of a flag, so `-n -team` fails
    /// on `-t`. What is actually missing there is the value of `-n`.
    fn unrecognized(arg: String, args: &[OsString]) -> Self {
        match flag_expecting_value_before(args, &arg) {
            Some(flag) => Self::MissingValue(flag),
            None => Self::UnrecognizedArgument(arg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingRequiredField(flag) => write!(f, "missing required argument: `{flag}`"),
            Self::MissingValue(flag) => write!(f, "missing value for argument: `{flag}`"),
            Self::InvalidValue { flag, value } => {
                write!(f, "invalid value `{value}` for argument: `{flag}`")
            }
            Self::UnrecognizedArgument(arg) => write!(f, "unknown argument: `{arg}`"),
            Self::Malformed(reason) => write!(f, "malformed arguments: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

/// The flags that must be followed by a value.
const VALUE_FLAGS: [&str; 7] = ["-p", "--port", "-n", "--name", "-h", "--host", "--log-mode"];

/// Returns the value-taking flag that is directly followed by the `unknown` flag, if any.
fn flag_expecting_value_before(args: &[OsString], unknown: &str) -> Option<String> {
    if !unknown.starts_with('-') {
        return None;
    }

    args.windows(2).find_map(|pair| {
        let flag = pair[0].to_str()?;
        let next = pair[1].to_str()?;
        (VALUE_FLAGS.contains(&flag) && next.starts_with(unknown)).then(|| flag.to_owned())
    })
}

/// Extracts a piece of context from a `clap` error as a plain string.
fn context(err: &clap::Error, kind: ContextKind) -> String {
    match err.get(kind) {
        Some(ContextValue::String(value)) => value.clone(),
        Some(ContextValue::Strings(values)) => values.join(", "),
        _ => String::new(),
    }
}

/// The result of processing the command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user asked for the usage message.
    Help,
    /// The arguments are invalid. The usage message is printed along with the error.
    Error(Error),
    /// The arguments are valid and the client can be started.
    Ready(Configuration),
}

impl Outcome {
    /// Returns the exit code the process should terminate with.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Help | Self::Ready(_) => 0,
            Self::Error(_) => ERROR_EXIT_CODE,
        }
    }
}

/// Processes the arguments passed to the program, not including the program name.
///
/// This function performs no I/O. Use [`report`] to print what the outcome requires.
pub fn process<I, T>(args: I) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    //
    // Bare help invocations are answered before the actual parser runs, so that they don't
    // require a team name.
    //

    if is_bare_help(&args) {
        return Outcome::Help;
    }

    match Args::try_parse_from(&args) {
        Ok(parsed) if parsed.help => Outcome::Help,
        Ok(parsed) => Outcome::Ready(Configuration::from(parsed)),
        Err(err) => Outcome::Error(Error::from_clap(&err, &args)),
    }
}

/// Returns whether the arguments are one of `[]`, `["help"]` or `["--help"]`.
fn is_bare_help(args: &[OsString]) -> bool {
    match args {
        [] => true,
        [only] => only == "help" || only == "--help",
        _ => false,
    }
}

/// Writes the messages required by `outcome` to the provided streams.
///
/// The usage message goes to `stdout` for both help and errors, and the error message itself
/// goes to `stderr`. Nothing is written for a successful parse.
pub fn report(outcome: &Outcome, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<()> {
    match outcome {
        Outcome::Help => stdout.write_all(USAGE.as_bytes())?,
        Outcome::Error(err) => {
            writeln!(stderr, "error: {err}")?;
            stdout.write_all(USAGE.as_bytes())?;
        }
        Outcome::Ready(_) => {}
    }

    stdout.flush()?;
    stderr.flush()
}
