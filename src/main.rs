use anyhow::{bail, Context};
use chrono::{Datelike, Local};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, sync::Mutex};

use taskers::api::ApiClient;
use taskers::auth::{self, Credentials};
use taskers::config::Config;
use taskers::error::BoardError;
use taskers::kanban_board::TaskBoard;
use taskers::special_day::{parse_month, SpecialDayForm};
use taskers::storage::LocalStorage;
use taskers::store::{LocalStore, RemoteStore, TaskStore};
use taskers::task::Bucket;

mod cli;
mod ui;

use cli::{Cli, Commands, ViewArgs};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("taskers error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&cli, &config)?;

    let client = ApiClient::new(&config.api.base_url)?;
    let mut storage = LocalStorage::open(config.storage_path())?;

    match cli.command {
        Commands::Signup {
            email,
            username,
            password,
        } => {
            client.signup(&email, &username, &password).await?;
            println!("Check {email} for a confirmation code, then run `taskers confirm`.");
        }
        Commands::Confirm { email, otp } => {
            client.confirm_registration(&email, &otp).await?;
            println!("Account confirmed. You can log in now.");
        }
        Commands::Login { username, password } => {
            auth::login(&client, &mut storage, &username, &password).await?;
            println!("Logged in as {username}.");
        }
        Commands::Logout => auth::logout(&mut storage)?,
        Commands::ResetPassword { username } => {
            auth::request_password_reset(&client, &mut storage, &username).await?;
            println!("Reset code sent. Run `taskers reset-confirm` with it.");
        }
        Commands::ResetConfirm { token, password } => {
            auth::confirm_password_reset(&client, &mut storage, &token, &password).await?;
            println!("Your password has been reset.");
        }
        board_command => {
            let args = board_command
                .view_args()
                .cloned()
                .context("command does not act on a board")?;
            dispatch(board_command, &args, client, storage).await?;
        }
    }
    Ok(())
}

/// Builds the board for `args` on the chosen store and runs `command` on it.
async fn dispatch(
    command: Commands,
    args: &ViewArgs,
    client: ApiClient,
    storage: LocalStorage,
) -> anyhow::Result<()> {
    let view = args.resolve(Local::now().date_naive());
    if args.local {
        return run_board_command(command, TaskBoard::new(view, LocalStore::new(storage))).await;
    }
    let Some(access) = Credentials::load(&storage).access else {
        bail!("not logged in, run `taskers login` first");
    };
    run_board_command(command, TaskBoard::new(view, RemoteStore::new(client, access))).await
}

async fn run_board_command<S: TaskStore>(
    command: Commands,
    mut board: TaskBoard<S>,
) -> anyhow::Result<()> {
    board.load().await.map_err(reauth_hint)?;

    match command {
        Commands::Board(_) => {
            if let ui::Exit::ReauthRequired = run_tui(board).await? {
                bail!("session expired, run `taskers login` again");
            }
        }
        Commands::List(_) => print_board(&board),
        Commands::Add { title, .. } => match board.add_task(&title).await.map_err(reauth_hint)? {
            Some(id) => println!("Added task {id}"),
            None => println!("Nothing to add: the title is empty."),
        },
        Commands::Move {
            id, to, position, ..
        } => {
            let (from, index) = board
                .columns()
                .locate(&id)
                .ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
            let to_index = position.unwrap_or_else(|| board.columns().get(to).len());
            if board
                .move_task(from, index, to, to_index)
                .await
                .map_err(reauth_hint)?
            {
                println!("Moved task {id} to {}", to.label());
            }
        }
        Commands::Edit { id, title, .. } => {
            if board.edit_title(&id, &title).await.map_err(reauth_hint)? {
                println!("Renamed task {id}");
            }
        }
        Commands::Delete { id, .. } => {
            let (bucket, _) = board
                .columns()
                .locate(&id)
                .ok_or_else(|| BoardError::TaskNotFound(id.clone()))?;
            board.delete_task(&id, bucket).await.map_err(reauth_hint)?;
            println!("Deleted task {id}");
        }
        Commands::Special {
            month,
            day,
            year,
            title,
            ..
        } => {
            let form = SpecialDayForm {
                year: year.unwrap_or_else(|| Local::now().year()),
                month: Some(parse_month(&month)?),
                day: Some(day),
                title,
            };
            let id = board.add_special_day(form).await.map_err(reauth_hint)?;
            println!("Added special day {id}");
        }
        other => bail!("{other:?} does not act on a board"),
    }
    Ok(())
}

fn reauth_hint(err: BoardError) -> anyhow::Error {
    match err {
        BoardError::ReauthRequired => {
            anyhow::anyhow!("session expired or missing, run `taskers login` again")
        }
        other => other.into(),
    }
}

fn print_board<S: TaskStore>(board: &TaskBoard<S>) {
    println!("{}", board.view().title());
    for bucket in Bucket::ALL {
        println!("{}:", bucket.label());
        for task in board.columns().get(bucket) {
            match task.due_date {
                Some(due) => println!("- [#{}] {} (Due: {})", task.id, task.title, due),
                None => println!("- [#{}] {}", task.id, task.title),
            }
        }
    }
}

async fn run_tui<S: TaskStore>(board: TaskBoard<S>) -> anyhow::Result<ui::Exit> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, board).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(result?)
}

fn init_tracing(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKERS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The board owns the terminal, so its logs go to a file.
    let result = if matches!(cli.command, Commands::Board(_)) {
        let path = config.log_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    } else {
        builder.with_writer(io::stderr).try_init()
    };
    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
