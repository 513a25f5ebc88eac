#![forbid(unsafe_code)]

//! Demo shell for the microline engine on a POSIX terminal.

pub mod cli;
pub mod commands;
pub mod session;
