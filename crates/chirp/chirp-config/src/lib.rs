//! `chirp-config`: command-line contract for the `twitter` binary.
//!
//! Zero arguments select sequential mode; exactly two positive integers
//! select concurrent mode (worker count and per-wakeup block size). Any
//! other shape is a usage error the binary reports on stdout before
//! exiting cleanly.

/// Usage text printed for any argument shape other than the two supported
/// ones.
pub const USAGE: &str = "Usage: twitter <workers> <block>
  <workers> = number of worker threads draining the task queue
  <block>   = maximum number of tasks a worker drains per wakeup
Run with no arguments to process requests sequentially on one thread.";

/// How the server should run, as decided by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No queue, no workers: each request is handled inline as it is read.
    Sequential,
    /// One producer feeding `workers` threads that drain the task queue in
    /// blocks of at most `block`.
    Concurrent { workers: usize, block: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("expected zero or two arguments, got {0}")]
    Arity(usize),

    #[error("invalid value for `{name}`: `{value}`")]
    Invalid { name: &'static str, value: String },
}

impl RunMode {
    /// Parses the arguments after the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        match args.as_slice() {
            [] => Ok(RunMode::Sequential),
            [workers, block] => Ok(RunMode::Concurrent {
                workers: parse_positive("workers", workers)?,
                block: parse_positive("block", block)?,
            }),
            other => Err(ConfigError::Arity(other.len())),
        }
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_sequential() {
        assert_eq!(RunMode::from_args(args(&[])).unwrap(), RunMode::Sequential);
    }

    #[test]
    fn two_integers_is_concurrent() {
        assert_eq!(
            RunMode::from_args(args(&["4", "16"])).unwrap(),
            RunMode::Concurrent {
                workers: 4,
                block: 16
            }
        );
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(matches!(
            RunMode::from_args(args(&["4"])),
            Err(ConfigError::Arity(1))
        ));
        assert!(matches!(
            RunMode::from_args(args(&["4", "16", "2"])),
            Err(ConfigError::Arity(3))
        ));
    }

    #[test]
    fn non_numeric_and_zero_values_are_rejected() {
        assert!(matches!(
            RunMode::from_args(args(&["four", "16"])),
            Err(ConfigError::Invalid { name: "workers", .. })
        ));
        assert!(matches!(
            RunMode::from_args(args(&["4", "0"])),
            Err(ConfigError::Invalid { name: "block", .. })
        ));
    }
}
