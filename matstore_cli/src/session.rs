//! Session - resolves names through the registry and runs commands.

use crate::command::{tokenize, Command, CommandError};
use matstore_core::{codec, transform, Matrix, Registry, StoreError, DEFAULT_CAPACITY};
use matstore_env::{context_for_seed, StoreContext};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the matrix created by [`Session::bootstrap`].
pub const BOOTSTRAP_MATRIX: &str = "temp_mat";

/// Configuration for a shell session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Registry slot count
    pub capacity: usize,

    /// Random seed (0 = OS entropy)
    pub seed: u64,

    /// Directory that `read` and `write` resolve relative paths against
    pub data_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            seed: 0,
            data_dir: PathBuf::from("."),
        }
    }
}

/// Errors reported back to the shell. None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Matrix ({0}) doesn't exist")]
    NotFound(String),

    #[error("Duplication of {src} into {dest} did not verify")]
    Unverified { src: String, dest: String },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One occupied registry slot, as reported by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    pub slot: usize,
    pub name: String,
    pub rows: u32,
    pub cols: u32,
}

/// Result of a successful command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Displayed { matrix: Matrix },
    Created { name: String, rows: u32, cols: u32, slot: usize },
    Added { a: String, b: String, dest: String, slot: usize },
    Duplicated { src: String, dest: String, slot: usize },
    Compared { a: String, b: String, equal: bool },
    Shifted { name: String, direction: char, amount: u32 },
    Randomized { name: String, low: u32, high: u32 },
    Read { path: String, name: String, slot: usize },
    Written { name: String, path: String },
    Listed { slots: Vec<SlotSummary> },
    Exit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Displayed { matrix } => write!(f, "{}", matrix),
            Outcome::Created { name, rows, cols, .. } => {
                write!(f, "Created Matrix ({},{},{})", name, rows, cols)
            }
            Outcome::Added { a, b, dest, .. } => write!(f, "Added {} and {} into {}", a, b, dest),
            Outcome::Duplicated { src, dest, .. } => {
                write!(f, "Duplication of {} into {} finished", src, dest)
            }
            Outcome::Compared { equal: true, .. } => write!(f, "SAME DATA IN BOTH"),
            Outcome::Compared { equal: false, .. } => write!(f, "DIFFERENT DATA IN BOTH"),
            Outcome::Shifted { name, amount, .. } => {
                write!(f, "Matrix ({}) has been shifted by {}", name, amount)
            }
            Outcome::Randomized { name, low, high } => {
                write!(f, "Matrix ({}) is randomized between {} {}", name, low, high)
            }
            Outcome::Read { path, .. } => write!(f, "Matrix ({}) is read from the filesystem", path),
            Outcome::Written { name, .. } => {
                write!(f, "Matrix ({}) is written out to the filesystem", name)
            }
            Outcome::Listed { slots } => {
                for s in slots {
                    writeln!(f, "[{}] {} ({},{})", s.slot, s.name, s.rows, s.cols)?;
                }
                Ok(())
            }
            Outcome::Exit => Ok(()),
        }
    }
}

/// A shell session: one registry plus one random source.
pub struct Session {
    registry: Registry,
    ctx: Box<dyn StoreContext>,
    data_dir: PathBuf,
}

impl Session {
    /// Creates a session whose random source follows `config.seed`.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        Self::with_context(config, context_for_seed(config.seed))
    }

    /// Creates a session with an explicit random source.
    pub fn with_context(
        config: &SessionConfig,
        ctx: Box<dyn StoreContext>,
    ) -> Result<Self, SessionError> {
        let registry = Registry::new(config.capacity)?;
        info!(
            capacity = config.capacity,
            seed = ctx.seed(),
            data_dir = %config.data_dir.display(),
            "session started"
        );
        Ok(Self {
            registry,
            ctx,
            data_dir: config.data_dir.clone(),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tokenizes, parses, and runs one line. Empty lines yield `Ok(None)`.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Outcome>, SessionError> {
        match Command::parse(&tokenize(line))? {
            Some(cmd) => self.execute(cmd).map(Some),
            None => Ok(None),
        }
    }

    /// Runs one command.
    pub fn execute(&mut self, cmd: Command) -> Result<Outcome, SessionError> {
        debug!(command = %cmd, "executing");
        match cmd {
            Command::Display { name } => {
                let matrix = self.lookup(&name)?.clone();
                Ok(Outcome::Displayed { matrix })
            }
            Command::Create { name, rows, cols } => {
                let matrix = Matrix::create(&name, rows, cols)?;
                let slot = self.registry.insert(matrix);
                Ok(Outcome::Created { name, rows, cols, slot })
            }
            Command::Add { a, b, dest } => {
                // Sum is complete before insertion; inserting may evict an operand.
                let lhs = self.lookup(&a)?;
                let rhs = self.lookup(&b)?;
                let mut sum = Matrix::create(&dest, lhs.rows(), lhs.cols())?;
                transform::add(lhs, rhs, &mut sum)?;
                let slot = self.registry.insert(sum);
                Ok(Outcome::Added { a, b, dest, slot })
            }
            Command::Duplicate { src, dest } => {
                let source = self.lookup(&src)?;
                let mut copy = Matrix::create(&dest, source.rows(), source.cols())?;
                if !source.duplicate(&mut copy)? {
                    return Err(SessionError::Unverified { src, dest });
                }
                let slot = self.registry.insert(copy);
                Ok(Outcome::Duplicated { src, dest, slot })
            }
            Command::Equal { a, b } => {
                let equal = self.lookup(&a)?.equal(self.lookup(&b)?);
                Ok(Outcome::Compared { a, b, equal })
            }
            Command::Shift { name, direction, amount } => {
                let matrix = self.lookup_mut(&name)?;
                transform::bitwise_shift(matrix, direction, amount)?;
                Ok(Outcome::Shifted { name, direction, amount })
            }
            Command::Random { name, low, high } => {
                let matrix = self
                    .registry
                    .get_mut_by_name(&name)
                    .ok_or_else(|| SessionError::NotFound(name.clone()))?;
                transform::randomize(matrix, low, high, self.ctx.rng())?;
                Ok(Outcome::Randomized { name, low, high })
            }
            Command::Read { path } => {
                let matrix = codec::read(self.resolve(&path))?;
                let name = matrix.name().to_string();
                let slot = self.registry.insert(matrix);
                Ok(Outcome::Read { path, name, slot })
            }
            Command::Write { name } => {
                let target = self.resolve(&name);
                codec::write(&target, self.lookup(&name)?)?;
                Ok(Outcome::Written {
                    name,
                    path: target.display().to_string(),
                })
            }
            Command::List => Ok(Outcome::Listed {
                slots: self
                    .registry
                    .iter()
                    .map(|(slot, m)| SlotSummary {
                        slot,
                        name: m.name().to_string(),
                        rows: m.rows(),
                        cols: m.cols(),
                    })
                    .collect(),
            }),
            Command::Exit => Ok(Outcome::Exit),
        }
    }

    /// Creates `temp_mat` (5x5), randomizes it in [10, 15], and writes it out.
    pub fn bootstrap(&mut self) -> Result<Vec<Outcome>, SessionError> {
        let name = BOOTSTRAP_MATRIX.to_string();
        [
            Command::Create { name: name.clone(), rows: 5, cols: 5 },
            Command::Random { name: name.clone(), low: 10, high: 15 },
            Command::Write { name },
        ]
        .into_iter()
        .map(|cmd| self.execute(cmd))
        .collect()
    }

    /// Destroys every remaining matrix.
    pub fn close(&mut self) {
        let live = self.registry.len();
        self.registry.clear();
        info!(released = live, "session closed");
    }

    fn lookup(&self, name: &str) -> Result<&Matrix, SessionError> {
        self.registry
            .get_by_name(name)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Matrix, SessionError> {
        self.registry
            .get_mut_by_name(name)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.data_dir.join(Path::new(path))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.registry.clear();
    }
}
