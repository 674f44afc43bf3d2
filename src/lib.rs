//! hncli: a Hacker News browser for the terminal.

pub mod api;
pub mod cli;
pub mod core;
pub mod repl;

#[cfg(test)]
pub mod test_support;
