#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `OBSDICT_DEMO_*` prefix.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
obsdict demo: a read-only dictionary view bound to a row of buttons

USAGE:
    obsdict-demo [OPTIONS]

Without --script, button names are read from stdin, one per line.

OPTIONS:
    --script=LIST        Comma-separated buttons to press, e.g. add,add,modify,remove
    --seed=N             Seed for the Modify button's value picker (default: 1)
    --log=FILTER         tracing filter, e.g. obsdict=trace (default: warn)
    --status             Print the window status record after every press
    --help, -h           Show this help message
    --version, -V        Show version

BUTTONS:
    add                  Add the next KeyN/ValN pair
    remove               Remove the last key
    modify               Assign a random ValN to the last key
    clear                Remove every entry
    status               Print the window status record

ENVIRONMENT VARIABLES:
    OBSDICT_DEMO_SCRIPT  Override --script
    OBSDICT_DEMO_SEED    Override --seed
    OBSDICT_DEMO_LOG     Override --log (RUST_LOG is used when neither is set)
    OBSDICT_DEMO_STATUS  Override --status (1/true to enable)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Buttons to press instead of reading stdin.
    pub script: Option<String>,
    /// Seed for the Modify button.
    pub seed: u64,
    /// tracing filter directive, if given.
    pub log_filter: Option<String>,
    /// Print the status record after every press.
    pub show_status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            script: None,
            seed: 1,
            log_filter: None,
            show_status: false,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("obsdict-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env("OBSDICT_DEMO_SCRIPT")
            && !val.trim().is_empty()
        {
            opts.script = Some(val);
        }
        if let Some(val) = get_env("OBSDICT_DEMO_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = n;
        }
        if let Some(val) = get_env("OBSDICT_DEMO_LOG")
            && !val.trim().is_empty()
        {
            opts.log_filter = Some(val);
        }
        if let Some(val) = get_env("OBSDICT_DEMO_STATUS") {
            opts.show_status = val == "1" || val.eq_ignore_ascii_case("true");
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                "--status" => opts.show_status = true,
                other => {
                    if let Some(val) = other.strip_prefix("--script=") {
                        opts.script = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        match val.parse() {
                            Ok(n) => opts.seed = n,
                            Err(_) => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--seed",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log_filter = Some(val.to_string());
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }

    /// Buttons listed in `--script`, in order. Blank items are skipped.
    #[must_use]
    pub fn script_items(&self) -> Option<Vec<String>> {
        self.script.as_ref().map(|script| {
            script
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with_env<I, S>(
        args: I,
        env_pairs: &[(&'static str, &'static str)],
    ) -> Result<Opts, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = std::collections::HashMap::new();
        for (key, value) in env_pairs {
            map.insert(*key, *value);
        }
        Opts::parse_from_env_and_args(args, |key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert!(opts.script.is_none());
        assert_eq!(opts.seed, 1);
        assert!(opts.log_filter.is_none());
        assert!(!opts.show_status);
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_lists_buttons() {
        for button in ["add", "remove", "modify", "clear", "status"] {
            assert!(HELP_TEXT.contains(button), "missing {button}");
        }
    }

    #[test]
    fn flags_parse() {
        let opts = parse_with_env(
            ["--script=add,modify", "--seed=9", "--log=obsdict=trace", "--status"],
            &[],
        )
        .expect("valid args");
        assert_eq!(opts.script.as_deref(), Some("add,modify"));
        assert_eq!(opts.seed, 9);
        assert_eq!(opts.log_filter.as_deref(), Some("obsdict=trace"));
        assert!(opts.show_status);
    }

    #[test]
    fn env_applies_when_flags_absent() {
        let opts = parse_with_env(
            Vec::<String>::new(),
            &[
                ("OBSDICT_DEMO_SCRIPT", "add,add"),
                ("OBSDICT_DEMO_SEED", "42"),
                ("OBSDICT_DEMO_STATUS", "TRUE"),
            ],
        )
        .expect("valid env");
        assert_eq!(opts.script.as_deref(), Some("add,add"));
        assert_eq!(opts.seed, 42);
        assert!(opts.show_status);
    }

    #[test]
    fn flags_override_env() {
        let opts = parse_with_env(["--seed=3"], &[("OBSDICT_DEMO_SEED", "42")])
            .expect("valid args");
        assert_eq!(opts.seed, 3);
    }

    #[test]
    fn bad_env_seed_is_ignored() {
        let opts = parse_with_env(Vec::<String>::new(), &[("OBSDICT_DEMO_SEED", "x")])
            .expect("valid env");
        assert_eq!(opts.seed, 1);
    }

    #[test]
    fn invalid_seed_flag() {
        assert_eq!(
            parse_with_env(["--seed=lots"], &[]),
            Err(ParseError::InvalidValue {
                flag: "--seed",
                value: "lots".into(),
            })
        );
    }

    #[test]
    fn unknown_arg() {
        assert_eq!(
            parse_with_env(["--frobnicate"], &[]),
            Err(ParseError::UnknownArg("--frobnicate".into()))
        );
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse_with_env(["-h"], &[]), Err(ParseError::Help));
        assert_eq!(parse_with_env(["--version"], &[]), Err(ParseError::Version));
    }

    #[test]
    fn script_items_split_and_trim() {
        let opts = Opts {
            script: Some(" add, ,modify ,remove".into()),
            ..Opts::default()
        };
        assert_eq!(
            opts.script_items(),
            Some(vec!["add".into(), "modify".into(), "remove".into()])
        );
        assert_eq!(Opts::default().script_items(), None);
    }
}
