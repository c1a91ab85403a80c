#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Data source base URL, overrides the environment
    pub server: Option<String>,
    /// Empty the persisted watchlist before starting
    pub reset: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: i32,
    pub message: String,
}

impl ParseError {
    fn usage(message: String) -> Self {
        Self {
            code: 2,
            message: format!("{message}\n\n{}", help_text(env!("CARGO_PKG_NAME"))),
        }
    }
}

#[must_use]
pub fn help_text(bin_name: &str) -> String {
    format!(
        "Stock Watch\n\nUsage:\n  {bin_name} [options]\n\nOptions:\n  -h, --help          Show this help\n  -V, --version       Show version\n      --server <url>  Data source base URL (env STOCKWATCH_SERVER_URL)\n      --reset         Empty the saved watchlist before starting\n"
    )
}

#[must_use]
pub fn version_text() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn parse_args<I, S>(args: I) -> Result<Command, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut show_help = false;
    let mut show_version = false;
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => show_help = true,
            "-V" | "--version" => show_version = true,
            "--reset" => parsed.reset = true,
            "--server" => {
                let url = args
                    .next()
                    .filter(|url| !url.trim().is_empty() && !url.starts_with('-'))
                    .ok_or_else(|| ParseError::usage("--server requires a URL".to_string()))?;
                parsed.server = Some(url);
            }
            _ if arg.starts_with("--server=") => {
                let url = &arg["--server=".len()..];
                if url.trim().is_empty() {
                    return Err(ParseError::usage("--server requires a URL".to_string()));
                }
                parsed.server = Some(url.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(ParseError::usage(format!("unknown option: {arg}")));
            }
            _ => {
                return Err(ParseError::usage(format!(
                    "unexpected argument: {arg}"
                )));
            }
        }
    }

    if show_help {
        return Ok(Command::Help);
    }

    if show_version {
        return Ok(Command::Version);
    }

    Ok(Command::Run(parsed))
}
