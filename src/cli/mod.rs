//! CLI command definitions for tododeck.
//!
//! The CLI is the presentation layer: it validates input (non-empty titles,
//! known assignees), resolves the signed-in user, and renders derived views.
//! The store itself stays policy-free.

pub mod commands;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::store::views::{SortKey, SortOrder};
use crate::types::{Priority, Status};

/// Local todo manager with user accounts and persisted filters.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize an empty todo collection
    Init,

    /// Create an account and sign in
    Signup(SignupArgs),

    /// Sign in to an existing account
    Signin(SigninArgs),

    /// Sign out of the current session
    Signout,

    /// Show the currently signed-in user
    Whoami,

    /// List known users (for assignment)
    Users,

    /// Add a todo
    Add(AddArgs),

    /// List todos through the sort/filter/search pipeline
    List(ListArgs),

    /// Show one todo in full
    Show {
        /// Todo id
        id: String,
    },

    /// Edit fields of an existing todo
    Edit(EditArgs),

    /// Flip a todo's done flag
    Toggle {
        /// Todo id
        id: String,
    },

    /// Delete a todo permanently
    Rm {
        /// Todo id
        id: String,
    },

    /// Remove every todo marked done
    ClearCompleted,

    /// Mark every todo done (or not done with --undone)
    ToggleAll {
        /// Clear the done flag instead of setting it
        #[arg(long)]
        undone: bool,
    },

    /// Show or change the persisted sort preference
    Sort(SortArgs),

    /// Show or change the persisted filters
    Filter(FilterArgs),

    /// Show aggregate counters
    Stats,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct SigninArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Todo title (must be non-empty)
    pub title: String,

    /// Free-text description
    #[arg(short = 'D', long, default_value = "")]
    pub description: String,

    #[arg(short, long, value_enum, default_value = "not-started")]
    pub status: StatusArg,

    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Assignee user id or display name
    #[arg(short, long)]
    pub assignee: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive search over title and description (not persisted)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// One-shot sort key override
    #[arg(long, value_enum)]
    pub sort: Option<SortKeyArg>,

    /// One-shot sort order override
    #[arg(long, value_enum)]
    pub order: Option<SortOrderArg>,

    /// One-shot status filter override (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub status: Option<Vec<StatusArg>>,

    /// Show every status regardless of the persisted filter
    #[arg(long, conflicts_with = "status")]
    pub any_status: bool,

    /// One-shot assignee filter override
    #[arg(long)]
    pub assignee: Option<String>,

    /// One-shot due-date lower bound override (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// One-shot due-date upper bound override (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(short, long, value_enum, default_value = "table")]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Todo id
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short = 'D', long)]
    pub description: Option<String>,

    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Mark done
    #[arg(long, conflicts_with = "undone")]
    pub done: bool,

    /// Mark not done
    #[arg(long)]
    pub undone: bool,

    #[arg(short, long, value_enum, conflicts_with = "clear_priority")]
    pub priority: Option<PriorityArg>,

    #[arg(long)]
    pub clear_priority: bool,

    /// Due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    #[arg(long)]
    pub clear_due: bool,

    /// Assignee user id or display name
    #[arg(short, long, conflicts_with = "unassign")]
    pub assignee: Option<String>,

    #[arg(long)]
    pub unassign: bool,
}

#[derive(Args, Debug)]
pub struct SortArgs {
    #[arg(long, value_enum, requires = "order")]
    pub key: Option<SortKeyArg>,

    #[arg(long, value_enum)]
    pub order: Option<SortOrderArg>,

    /// Reset to insertion order
    #[arg(long, conflicts_with_all = ["key", "order"])]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Statuses to show (comma-separated; empty selection shows nothing)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub status: Option<Vec<StatusArg>>,

    /// Assignee user id or display name
    #[arg(long, conflicts_with = "clear_assignee")]
    pub assignee: Option<String>,

    #[arg(long)]
    pub clear_assignee: bool,

    /// Due-date lower bound (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Due-date upper bound (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub clear_dates: bool,

    /// Reset every filter to its default
    #[arg(long, conflicts_with_all = [
        "status", "assignee", "clear_assignee", "from", "to", "clear_dates"
    ])]
    pub clear: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    NotStarted,
    InProgress,
    Completed,
    Pending,
    Done,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::NotStarted => Status::NotStarted,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Completed => Status::Completed,
            StatusArg::Pending => Status::Pending,
            StatusArg::Done => Status::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKeyArg {
    CreatedAt,
    Title,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::CreatedAt => SortKey::CreatedAt,
            SortKeyArg::Title => SortKey::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
    None,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
            SortOrderArg::None => SortOrder::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for crate::format::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => crate::format::OutputFormat::Table,
            FormatArg::Json => crate::format::OutputFormat::Json,
        }
    }
}
