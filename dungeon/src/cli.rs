//! Command-line flags.

use crate::scenario::{ScenarioConfig, ScenarioError};

pub const USAGE: &str = "\
Dungeon Adventure - three AI adventurers talk their way through a dungeon

USAGE:
    dungeon [OPTIONS]

OPTIONS:
    --seed <N>      Seed for random event selection
    --rounds <N>    Number of random events (default: 3)
    --steps <N>     World steps per round (default: 4)
    --model <ID>    Claude model to use
    -h, --help      Show this help

ENVIRONMENT:
    ANTHROPIC_API_KEY   Required. May also be set in a .env file.
    ANTHROPIC_BASE_URL  Optional API root, e.g. a proxy or local gateway.
    RUST_LOG            Log filter, e.g. RUST_LOG=troupe=info to see the dialogue.
";

/// What the binary was asked to do.
#[derive(Debug, Clone)]
pub enum Command {
    Run(ScenarioConfig),
    Help,
}

/// Parse flags (program name already stripped).
pub fn parse_args<I>(args: I) -> Result<Command, ScenarioError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = ScenarioConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--seed" => config.seed = Some(parse_value(&arg, args.next())?),
            "--rounds" => config.event_rounds = parse_value(&arg, args.next())?,
            "--steps" => config.steps_per_round = parse_value(&arg, args.next())?,
            "--model" => {
                let model = args
                    .next()
                    .ok_or_else(|| ScenarioError::InvalidArgument(format!("{arg} needs a value")))?;
                config.model = Some(model);
            }
            other => {
                return Err(ScenarioError::InvalidArgument(format!(
                    "unknown option {other} (try --help)"
                )))
            }
        }
    }

    Ok(Command::Run(config))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, ScenarioError> {
    let value = value.ok_or_else(|| ScenarioError::InvalidArgument(format!("{flag} needs a value")))?;
    value
        .parse()
        .map_err(|_| ScenarioError::InvalidArgument(format!("{flag}: not a number: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_gives_defaults() {
        let Command::Run(config) = parse_args(args(&[])).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(config.event_rounds, 3);
        assert_eq!(config.steps_per_round, 4);
        assert!(config.seed.is_none());
        assert!(config.model.is_none());
    }

    #[test]
    fn test_all_flags() {
        let parsed = parse_args(args(&[
            "--seed", "17", "--rounds", "5", "--steps", "2", "--model", "claude-3-haiku",
        ]))
        .unwrap();
        let Command::Run(config) = parsed else {
            panic!("expected run");
        };
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.event_rounds, 5);
        assert_eq!(config.steps_per_round, 2);
        assert_eq!(config.model.as_deref(), Some("claude-3-haiku"));
    }

    #[test]
    fn test_help_wins() {
        assert!(matches!(parse_args(args(&["--seed", "1", "-h"])).unwrap(), Command::Help));
    }

    #[test]
    fn test_bad_input() {
        let cases: [&[&str]; 4] = [&["--seed"], &["--rounds", "many"], &["--model"], &["--verbose"]];
        for bad in cases {
            let err = parse_args(args(bad)).unwrap_err();
            assert!(matches!(err, ScenarioError::InvalidArgument(_)), "{bad:?}");
        }
    }
}
