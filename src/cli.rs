use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use taskers::task::{Bucket, TaskId};
use taskers::view::View;

#[derive(Debug, Parser)]
#[command(name = "taskers", version, about = "Personal task boards in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account; a one-time code is mailed to confirm it
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm a signup with the mailed code
    Confirm {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Request a password reset code
    ResetPassword {
        #[arg(long)]
        username: String,
    },
    /// Set a new password with the reset code
    ResetConfirm {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
    },
    /// Open the interactive board
    Board(ViewArgs),
    /// Print the board
    List(ViewArgs),
    Add {
        #[command(flatten)]
        view: ViewArgs,
        title: String,
    },
    /// Move a task to another column
    Move {
        #[command(flatten)]
        view: ViewArgs,
        id: TaskId,
        to: Bucket,
        /// Position in the destination column (default: last)
        #[arg(long)]
        position: Option<usize>,
    },
    Edit {
        #[command(flatten)]
        view: ViewArgs,
        id: TaskId,
        title: String,
    },
    Delete {
        #[command(flatten)]
        view: ViewArgs,
        id: TaskId,
    },
    /// Add a task pinned to a yearly date
    Special {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        month: String,
        #[arg(long)]
        day: u32,
        #[arg(long)]
        year: Option<i32>,
        title: String,
    },
}

impl Commands {
    /// Board selection for commands that work on a board.
    pub fn view_args(&self) -> Option<&ViewArgs> {
        match self {
            Commands::Board(view) | Commands::List(view) => Some(view),
            Commands::Add { view, .. }
            | Commands::Move { view, .. }
            | Commands::Edit { view, .. }
            | Commands::Delete { view, .. }
            | Commands::Special { view, .. } => Some(view),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewKind {
    Today,
    Weekly,
    Monthly,
    Special,
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    #[arg(long, value_enum, default_value = "today")]
    pub view: ViewKind,

    /// Day to show: the exact day for the weekly planner, any day inside
    /// the period otherwise (default: today, or this week's Sunday)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Keep this board in the local key/value file instead of the server
    #[arg(long)]
    pub local: bool,
}

impl ViewArgs {
    pub fn resolve(&self, today: NaiveDate) -> View {
        let date = self.date.unwrap_or(today);
        match self.view {
            ViewKind::Today => View::Today { date },
            ViewKind::Weekly => match self.date {
                Some(day) => View::Weekly { day },
                None => View::weekly_containing(today),
            },
            ViewKind::Monthly => View::monthly_containing(date),
            ViewKind::Special => View::SpecialDays,
        }
    }
}
