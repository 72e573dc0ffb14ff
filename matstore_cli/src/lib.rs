//! matstore command shell
//!
//! Turns text lines into engine calls:
//!
//! ```text
//! line ──tokenize──► [&str] ──Command::parse──► Command ──Session::execute──► Outcome
//!                                                              │
//!                                                   Registry + Codec + Transforms
//! ```
//!
//! Every failure comes back as a [`SessionError`]; none of them end the
//! session, and a failed command leaves the registry untouched.
//!
//! # Usage
//!
//! ```ignore
//! use matstore_cli::{Session, SessionConfig};
//!
//! let mut session = Session::new(&SessionConfig::default())?;
//! session.execute_line("create A 2 2")?;
//! session.execute_line("random A 1 1")?;
//! session.execute_line("write A")?;
//! ```

pub mod command;
mod session;
pub mod shell;

pub use command::{tokenize, Command, CommandError, MAX_TOKENS};
pub use session::{Outcome, Session, SessionConfig, SessionError, SlotSummary, BOOTSTRAP_MATRIX};
pub use shell::ShellOptions;
