//! Command line surface of `hn`.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use log::info;

use crate::api::{HackerNewsClient, StoryList};
use crate::core::commands::{self, CommandError};
use crate::core::config;
use crate::core::state::App;
use crate::repl;

#[derive(Parser, Debug)]
#[command(name = "hn", version, about = "Browse Hacker News from the terminal")]
pub struct Cli {
    /// Print without colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of ~/.hncli/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Top stories
    Top(ListArgs),
    /// Best stories
    Best(ListArgs),
    /// Newest stories
    New(ListArgs),
    /// Ask HN posts
    Ask(ListArgs),
    /// Show HN posts
    Show(ListArgs),
    /// Job postings
    Jobs(ListArgs),
    /// Show a story by its position in the last listing or by id
    View {
        target: u64,

        /// Also print the comment tree
        #[arg(short, long)]
        comments: bool,

        /// Number of top-level comments to print
        #[arg(long, value_name = "N")]
        comments_limit: Option<usize>,
    },
    /// Show a user's profile
    User { name: String },
    /// Headlines from The Onion
    Onion(ListArgs),
    /// Search a "Who is hiring?" thread
    Hiring(ThreadSearch),
    /// Search a "Freelancer? Seeking freelancer?" thread
    Freelance(ThreadSearch),
    /// Start the interactive shell
    Shell,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Number of items to print
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ThreadSearch {
    /// Text to look for, case-insensitive
    pub query: String,

    /// Id of the monthly thread
    #[arg(long)]
    pub id: u64,
}

/// Runs one non-interactive command.
pub async fn execute(app: &App, command: Command, out: &mut dyn Write) -> Result<(), CommandError> {
    match command {
        Command::Top(args) => commands::list_stories(app, StoryList::Top, args.limit, out).await,
        Command::Best(args) => commands::list_stories(app, StoryList::Best, args.limit, out).await,
        Command::New(args) => commands::list_stories(app, StoryList::New, args.limit, out).await,
        Command::Ask(args) => commands::list_stories(app, StoryList::Ask, args.limit, out).await,
        Command::Show(args) => commands::list_stories(app, StoryList::Show, args.limit, out).await,
        Command::Jobs(args) => commands::list_stories(app, StoryList::Jobs, args.limit, out).await,
        Command::View {
            target,
            comments,
            comments_limit,
        } => commands::view(app, target, comments, comments_limit, out).await,
        Command::User { name } => commands::show_user(app, &name, out).await,
        Command::Onion(args) => commands::onion(args.limit, out),
        Command::Hiring(search) | Command::Freelance(search) => {
            commands::search_thread(app, search.id, &search.query, out).await
        }
        Command::Shell => {
            writeln!(out, "Already in the shell.")?;
            Ok(())
        }
    }
}

pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = config::load_config(cli.config.as_deref())?;
    let resolved = config::resolve(&config, cli.no_color);
    info!(
        "Config resolved: color={}, story_limit={}, api={}",
        resolved.color, resolved.story_limit, resolved.api_base_url
    );

    let source = Arc::new(HackerNewsClient::new(Some(resolved.api_base_url.clone())));
    let app = App::from_config(source, &resolved);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match command {
        Command::Shell => repl::run(app, Rc::new(runtime))?,
        command => {
            let mut out = io::stdout().lock();
            runtime.block_on(execute(&app, command, &mut out))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{story, test_app};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = parse(&["hn"]);
        assert_eq!(cli.command, None);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["hn", "top", "--limit", "3", "--no-color"]);
        assert!(cli.no_color);
        assert_eq!(cli.command, Some(Command::Top(ListArgs { limit: Some(3) })));
    }

    #[test]
    fn test_view_args() {
        let cli = parse(&["hn", "view", "2", "-c", "--comments-limit", "7"]);
        assert_eq!(
            cli.command,
            Some(Command::View {
                target: 2,
                comments: true,
                comments_limit: Some(7)
            })
        );
    }

    #[test]
    fn test_hiring_requires_id() {
        assert!(Cli::try_parse_from(["hn", "hiring", "rust"]).is_err());
        let cli = parse(&["hn", "hiring", "rust", "--id", "42"]);
        assert_eq!(
            cli.command,
            Some(Command::Hiring(ThreadSearch {
                query: "rust".into(),
                id: 42
            }))
        );
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_execute_dispatches_listing() {
        let (app, _dir) = test_app(vec![story(1, "Rust 2.0", vec![])]);
        let mut out = Vec::new();
        tokio_test::block_on(execute(&app, Command::Top(ListArgs { limit: None }), &mut out))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Top Stories"));
        assert!(text.contains("Rust 2.0"));
    }

    #[test]
    fn test_execute_onion_is_offline() {
        let (app, _dir) = test_app(vec![]);
        let mut out = Vec::new();
        tokio_test::block_on(execute(&app, Command::Onion(ListArgs { limit: Some(2) }), &mut out))
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }
}
