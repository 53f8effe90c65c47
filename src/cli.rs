use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "julython")]
#[command(about = "A CLI for the Julython commit leaderboard", version)]
#[command(after_help = "EXAMPLES:
    julython boards                      Show the project leaderboards
    julython commits --user alice        Recent commits by a user
    julython profile alice               Commit chart for July
    julython hooks add julython/july     Install the commit webhook")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List commits
    #[command(
        alias = "c",
        after_help = "EXAMPLES:
    julython commits
    julython commits --user alice --limit 50
    julython commits --project 42 --language Python --language Rust
    julython commits --more"
    )]
    Commits(CommitListArgs),
    /// Show the large, medium and small project leaderboards
    #[command(
        alias = "b",
        after_help = "EXAMPLES:
    julython boards
    julython boards --limit 25 --format json"
    )]
    Boards {
        /// Projects per board
        #[arg(long, short)]
        limit: Option<u32>,
    },
    /// List your GitHub repositories
    #[command(after_help = "EXAMPLES:
    julython repos
    julython repos --all")]
    Repos {
        /// Fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Manage repository webhooks
    #[command(after_help = "EXAMPLES:
    julython hooks list julython/july
    julython hooks add julython/july
    julython hooks test julython/july 12345")]
    Hooks {
        #[command(subcommand)]
        action: HookCommands,
    },
    /// List a user's badges
    #[command(after_help = "EXAMPLES:
    julython badges alice")]
    Badges {
        /// Username
        user: String,
    },
    /// List locations and their scores
    #[command(after_help = "EXAMPLES:
    julython locations
    julython locations --search port")]
    Locations(GroupListArgs),
    /// List teams and their scores
    #[command(after_help = "EXAMPLES:
    julython teams
    julython teams --search python")]
    Teams(GroupListArgs),
    /// Show a user's commit activity for July
    #[command(after_help = "EXAMPLES:
    julython profile alice
    julython profile alice --year 2013")]
    Profile(ProfileArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    julython completions bash > ~/.bash_completion.d/julython
    julython completions zsh > ~/.zfunc/_julython
    julython completions fish > ~/.config/fish/completions/julython.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    julython init")]
    Init,
}

#[derive(Subcommand)]
pub enum HookCommands {
    /// List webhooks on a repository
    #[command(alias = "ls")]
    List {
        /// Repository as owner/name
        repo: String,
    },
    /// Add the Julython webhook to a repository
    Add {
        /// Repository as owner/name
        repo: String,
    },
    /// Ask GitHub to send a test delivery for a webhook
    Test {
        /// Repository as owner/name
        repo: String,
        /// Hook ID
        hook_id: u64,
    },
}

#[derive(Args, Clone)]
pub struct CommitListArgs {
    /// Filter by project ID
    #[arg(long)]
    pub project: Option<String>,

    /// Filter by username
    #[arg(long)]
    pub user: Option<String>,

    /// Filter by language (repeatable)
    #[arg(long = "language")]
    pub languages: Vec<String>,

    /// Commits per page (default: 20)
    #[arg(long, short)]
    pub limit: Option<u32>,

    /// Fetch all results (may be slow for large result sets)
    #[arg(long, conflicts_with = "more")]
    pub all: bool,

    /// Prompt to load the next page after each one
    #[arg(long)]
    pub more: bool,
}

#[derive(Args, Clone)]
pub struct GroupListArgs {
    /// Only show names containing this text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Maximum number to show per page (default: 20)
    #[arg(long, short)]
    pub limit: Option<u32>,
}

#[derive(Args, Clone)]
pub struct ProfileArgs {
    /// Username
    pub user: String,

    /// Year whose July to chart (default: current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Chart height in rows
    #[arg(long, default_value = "10")]
    pub rows: u16,
}
