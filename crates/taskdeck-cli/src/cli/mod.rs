//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use taskdeck_core::api::{ApiClient, Credentials, Registration};
use taskdeck_core::config;
use taskdeck_core::filter::TaskFilter;
use taskdeck_core::logging;
use taskdeck_core::session::{FileTokenStore, Session};
use taskdeck_core::task::{TaskId, TaskPriority, TaskStatus};

mod commands;

use commands::tasks::{DueChange, TaskChanges, TaskContext};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version)]
#[command(about = "Terminal client for the task API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum TaskCommands {
    /// Lists tasks matching the filters
    List {
        /// Pending, in-progress or completed
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Low, medium or high
        #[arg(long)]
        priority: Option<TaskPriority>,
        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Creates a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
    },
    /// Edits a task; unspecified fields keep their current value
    Update {
        #[arg(value_name = "ID")]
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
    },
    /// Deletes a task
    Delete {
        #[arg(value_name = "ID")]
        id: TaskId,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the API base URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {err:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    let Some(command) = cli.command else {
        let _enter = rt.enter();
        return run_tui(&config);
    };

    rt.block_on(async move { dispatch(command, &config).await })
}

#[cfg(feature = "tui")]
fn run_tui(config: &config::Config) -> Result<()> {
    let api = ApiClient::from_config(config)?;
    commands::tui::run(api, open_session()?)
}

#[cfg(not(feature = "tui"))]
fn run_tui(_config: &config::Config) -> Result<()> {
    anyhow::bail!("This build has no terminal UI. Run `taskdeck --help` for commands.")
}

fn open_session() -> Result<Session> {
    Session::open(Arc::new(FileTokenStore::default_location())).context("open session")
}

async fn dispatch(command: Commands, config: &config::Config) -> Result<()> {
    let connect = || -> Result<(ApiClient, Session)> {
        Ok((ApiClient::from_config(config)?, open_session()?))
    };

    match command {
        Commands::Login { username, password } => {
            let (api, mut session) = connect()?;
            commands::auth::login(&api, &mut session, Credentials { username, password }).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            let api = ApiClient::from_config(config)?;
            let registration = Registration {
                username,
                email,
                password,
            };
            commands::auth::register(&api, registration).await
        }
        Commands::Logout => commands::auth::logout(&mut open_session()?),
        Commands::Tasks { command } => {
            let (api, mut session) = connect()?;
            run_task_command(command, &mut TaskContext::new(&api, &mut session)).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}

async fn run_task_command(command: TaskCommands, ctx: &mut TaskContext<'_>) -> Result<()> {
    match command {
        TaskCommands::List {
            status,
            priority,
            search,
        } => {
            let filter = TaskFilter {
                status,
                priority,
                search: search.unwrap_or_default(),
            };
            ctx.list(&filter).await
        }
        TaskCommands::Add {
            title,
            description,
            due,
            status,
            priority,
        } => {
            let changes = TaskChanges {
                title: Some(title),
                description,
                due: due.map(DueChange::Set),
                status,
                priority,
            };
            ctx.add(changes).await
        }
        TaskCommands::Update {
            id,
            title,
            description,
            due,
            clear_due,
            status,
            priority,
        } => {
            let due = if clear_due {
                Some(DueChange::Clear)
            } else {
                due.map(DueChange::Set)
            };
            let changes = TaskChanges {
                title,
                description,
                due,
                status,
                priority,
            };
            ctx.update(id, changes).await
        }
        TaskCommands::Delete { id } => ctx.delete(id).await,
    }
}
