//! Command-line arguments.
//!
//! The only argument is an optional desktop name:
//!
//! ```text
//! deskstart              # every active desktop
//! deskstart web          # only the desktop named "web"
//! deskstart -h | --help  # usage
//! ```

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and exit successfully.
    Help,
    /// Start programs, optionally for a single desktop.
    Run { desktop: Option<String> },
}

/// Wrong number of arguments.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected at most one desktop name, got {0} arguments")]
pub struct UsageError(pub usize);

/// One-line usage text for `program`.
pub fn usage(program: &str) -> String {
    format!("usage: {} [DESKTOP_NAME]", program)
}

/// Parse the arguments **after** the program name.
pub fn parse_args<I>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    match args.as_slice() {
        [] => Ok(Invocation::Run { desktop: None }),
        [flag] if flag == "-h" || flag == "--help" => Ok(Invocation::Help),
        [name] => Ok(Invocation::Run {
            desktop: Some(name.clone()),
        }),
        _ => Err(UsageError(args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_argument_runs_everything() {
        assert_eq!(
            parse_args(args(&[])),
            Ok(Invocation::Run { desktop: None })
        );
    }

    #[test]
    fn one_argument_is_a_desktop() {
        assert_eq!(
            parse_args(args(&["web"])),
            Ok(Invocation::Run {
                desktop: Some("web".into())
            })
        );
    }

    #[test]
    fn two_arguments_is_a_usage_error() {
        assert_eq!(parse_args(args(&["web", "mail"])), Err(UsageError(2)));
    }

    #[test]
    fn help_flags() {
        assert_eq!(parse_args(args(&["-h"])), Ok(Invocation::Help));
        assert_eq!(parse_args(args(&["--help"])), Ok(Invocation::Help));
        assert_eq!(parse_args(args(&["--help", "web"])), Err(UsageError(2)));
    }

    #[test]
    fn usage_names_the_program() {
        assert_eq!(usage("deskstart"), "usage: deskstart [DESKTOP_NAME]");
    }
}
