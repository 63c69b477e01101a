//! # Cool Server
//!
//! A console-driven simulated game server that hosts the cool plugin. Players,
//! chat, movement and commands are typed at the console (or read from a
//! script) and delivered to the plugin as events; plugin output is printed as
//! a transcript.

pub mod cli;
pub mod config;
pub mod console;
pub mod host;
pub mod logging;
pub mod server;
pub mod signals;

pub use cli::CliArgs;
pub use config::AppConfig;
pub use console::{parse_line, ConsoleCommand, ConsoleError, Issuer};
pub use host::{HostError, SimPlayer, SimulatedHost};
pub use server::{CoolServer, Flow, SessionError, UNKNOWN_COMMAND};
