//! Line tokenizer and verb parser.

use std::fmt;
use thiserror::Error;

/// Tokens beyond this count are ignored.
pub const MAX_TOKENS: usize = 50;

/// Splits a line on whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().take(MAX_TOKENS).collect()
}

/// Command parse errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Not a command in this application: {0}")]
    Unknown(String),

    #[error("{verb} takes {expected} argument(s), got {found}")]
    Arity {
        verb: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number for {arg}: {value:?}")]
    InvalidNumber { arg: &'static str, value: String },

    #[error("Invalid shift direction: {0:?} (expected l or r)")]
    InvalidDirection(String),
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Display { name: String },
    Create { name: String, rows: u32, cols: u32 },
    Add { a: String, b: String, dest: String },
    Duplicate { src: String, dest: String },
    Equal { a: String, b: String },
    Shift { name: String, direction: char, amount: u32 },
    Random { name: String, low: u32, high: u32 },
    Read { path: String },
    Write { name: String },
    List,
    Exit,
}

impl Command {
    /// Parses a tokenized line. Returns `Ok(None)` for an empty line.
    pub fn parse(tokens: &[&str]) -> Result<Option<Command>, CommandError> {
        let Some((&verb, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let cmd = match verb {
            "display" => {
                let [name] = arity::<1>("display", args)?;
                Command::Display { name: name.to_string() }
            }
            "create" => {
                let [name, rows, cols] = arity::<3>("create", args)?;
                Command::Create {
                    name: name.to_string(),
                    rows: number("rows", rows)?,
                    cols: number("cols", cols)?,
                }
            }
            "add" => {
                let [a, b, dest] = arity::<3>("add", args)?;
                Command::Add {
                    a: a.to_string(),
                    b: b.to_string(),
                    dest: dest.to_string(),
                }
            }
            "duplicate" => {
                let [src, dest] = arity::<2>("duplicate", args)?;
                Command::Duplicate {
                    src: src.to_string(),
                    dest: dest.to_string(),
                }
            }
            "equal" => {
                let [a, b] = arity::<2>("equal", args)?;
                Command::Equal {
                    a: a.to_string(),
                    b: b.to_string(),
                }
            }
            "shift" => {
                let [name, direction, amount] = arity::<3>("shift", args)?;
                let mut chars = direction.chars();
                let direction = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(CommandError::InvalidDirection(direction.to_string())),
                };
                Command::Shift {
                    name: name.to_string(),
                    direction,
                    amount: number("amount", amount)?,
                }
            }
            "random" => {
                let [name, low, high] = arity::<3>("random", args)?;
                Command::Random {
                    name: name.to_string(),
                    low: number("low", low)?,
                    high: number("high", high)?,
                }
            }
            "read" => {
                let [path] = arity::<1>("read", args)?;
                Command::Read { path: path.to_string() }
            }
            "write" => {
                let [name] = arity::<1>("write", args)?;
                Command::Write { name: name.to_string() }
            }
            "list" => {
                let [] = arity::<0>("list", args)?;
                Command::List
            }
            "exit" => {
                let [] = arity::<0>("exit", args)?;
                Command::Exit
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(cmd))
    }

    /// The command's verb.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Display { .. } => "display",
            Command::Create { .. } => "create",
            Command::Add { .. } => "add",
            Command::Duplicate { .. } => "duplicate",
            Command::Equal { .. } => "equal",
            Command::Shift { .. } => "shift",
            Command::Random { .. } => "random",
            Command::Read { .. } => "read",
            Command::Write { .. } => "write",
            Command::List => "list",
            Command::Exit => "exit",
        }
    }
}

/// Renders the command back as a line that parses to the same command.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())?;
        match self {
            Command::Display { name } | Command::Write { name } => write!(f, " {}", name),
            Command::Create { name, rows, cols } => write!(f, " {} {} {}", name, rows, cols),
            Command::Add { a, b, dest } => write!(f, " {} {} {}", a, b, dest),
            Command::Duplicate { src, dest } => write!(f, " {} {}", src, dest),
            Command::Equal { a, b } => write!(f, " {} {}", a, b),
            Command::Shift { name, direction, amount } => {
                write!(f, " {} {} {}", name, direction, amount)
            }
            Command::Random { name, low, high } => write!(f, " {} {} {}", name, low, high),
            Command::Read { path } => write!(f, " {}", path),
            Command::List | Command::Exit => Ok(()),
        }
    }
}

fn arity<'a, const N: usize>(
    verb: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(args).map_err(|_| CommandError::Arity {
        verb,
        expected: N,
        found: args.len(),
    })
}

fn number(arg: &'static str, value: &str) -> Result<u32, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidNumber {
        arg,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        Command::parse(&tokenize(line))
    }

    #[test]
    fn test_tokenize_whitespace() {
        assert_eq!(tokenize("  add  a\tb c\n"), vec!["add", "a", "b", "c"]);
        assert!(tokenize("   \n").is_empty());
    }

    #[test]
    fn test_tokenize_caps_token_count() {
        let line = "x ".repeat(MAX_TOKENS + 10);
        assert_eq!(tokenize(&line).len(), MAX_TOKENS);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse(""), Ok(None));
    }

    #[test]
    fn test_parse_create() {
        assert_eq!(
            parse("create A 2 3"),
            Ok(Some(Command::Create {
                name: "A".into(),
                rows: 2,
                cols: 3
            }))
        );
    }

    #[test]
    fn test_parse_shift() {
        assert_eq!(
            parse("shift A l 4"),
            Ok(Some(Command::Shift {
                name: "A".into(),
                direction: 'l',
                amount: 4
            }))
        );
        assert_eq!(
            parse("shift A left 4"),
            Err(CommandError::InvalidDirection("left".into()))
        );
        // Single-char directions are passed through; the engine validates them
        assert!(matches!(
            parse("shift A x 4"),
            Ok(Some(Command::Shift { direction: 'x', .. }))
        ));
    }

    #[test]
    fn test_parse_arity() {
        assert_eq!(
            parse("add a b"),
            Err(CommandError::Arity {
                verb: "add",
                expected: 3,
                found: 2
            })
        );
        assert!(parse("exit now").is_err());
        assert_eq!(parse("exit"), Ok(Some(Command::Exit)));
        assert_eq!(parse("list"), Ok(Some(Command::List)));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(
            parse("random A 1 -5"),
            Err(CommandError::InvalidNumber {
                arg: "high",
                value: "-5".into()
            })
        );
        assert!(parse("create A two 2").is_err());
    }

    #[test]
    fn test_unknown_verb() {
        assert_eq!(
            parse("transpose A"),
            Err(CommandError::Unknown("transpose".into()))
        );
    }

    #[test]
    fn test_parse_io_verbs() {
        assert_eq!(
            parse("read data/A"),
            Ok(Some(Command::Read { path: "data/A".into() }))
        );
        assert_eq!(
            parse("write A"),
            Ok(Some(Command::Write { name: "A".into() }))
        );
        assert_eq!(
            parse("duplicate A B"),
            Ok(Some(Command::Duplicate {
                src: "A".into(),
                dest: "B".into()
            }))
        );
        assert_eq!(
            parse("equal A B").map(|c| c.map(|c| c.verb())),
            Ok(Some("equal"))
        );
    }

    #[test]
    fn test_display_reparses() {
        for line in [
            "display A",
            "create A 2 3",
            "add A B C",
            "duplicate A B",
            "equal A B",
            "shift A r 3",
            "random A 10 15",
            "read data/A",
            "write A",
            "list",
            "exit",
        ] {
            let cmd = parse(line).unwrap().unwrap();
            assert_eq!(cmd.to_string(), line);
        }
    }

    proptest! {
        #[test]
        fn prop_parse_total(line in "\\PC{0,80}") {
            // Any input parses or errors; it never panics
            let _ = parse(&line);
        }

        #[test]
        fn prop_create_roundtrips_numbers(rows in any::<u32>(), cols in any::<u32>()) {
            let line = format!("create m {} {}", rows, cols);
            prop_assert_eq!(
                parse(&line),
                Ok(Some(Command::Create { name: "m".into(), rows, cols }))
            );
        }
    }
}
