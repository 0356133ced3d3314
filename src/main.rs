//! Taskstore CLI - a task list with undo/redo, sorting and bulk delete.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use taskstore::{
    Operation, SortAlgorithm, StoreBulkExt, StoreConfig, StoreWorker, Task, TaskStore, WorkerConfig, WorkerHandle,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

mod cli;

use cli::{Cli, Command, Op, ShellCommand, ShellLine, split_words};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskstore")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskstore.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Open the task file, or start empty if it does not exist yet.
fn open_store(path: &Path, config: StoreConfig) -> Result<TaskStore> {
    if path.exists() {
        TaskStore::open(path, config).with_context(|| format!("Failed to open {}", path.display()))
    } else {
        info!("No task file at {}, starting empty", path.display());
        TaskStore::new(config)
    }
}

fn format_priority(priority: u32) -> ColoredString {
    let label = format!("P{}", priority);
    match priority {
        1 => label.red().bold(),
        2 => label.yellow(),
        _ => label.normal(),
    }
}

fn print_task(task: &Task) {
    println!(
        "  {} {} {}",
        format_priority(task.priority),
        task.title.cyan(),
        task.due_date.format("%m/%d/%Y").to_string().dimmed()
    );
}

fn print_tasks(tasks: &[Task], empty: &str) {
    if tasks.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    for task in tasks {
        print_task(task);
    }
}

fn print_detail(task: &Task) {
    println!("{}: {}", "Title".bold(), task.title.cyan());
    println!("{}: {}", "Priority".bold(), format_priority(task.priority));
    println!("{}: {}", "Due".bold(), task.due_date.format("%m/%d/%Y"));
    if !task.description.is_empty() {
        println!("{}: {}", "Description".bold(), task.description);
    }
}

fn print_history(done: &str, verb: &str, operation: Option<Operation>) {
    match operation {
        Some(op) => println!("{} {} {}", "↺".blue(), done, op),
        None => println!("{}", format!("Nothing to {}", verb).dimmed()),
    }
}

/// Build a task from `add` arguments.
fn new_task(title: String, priority: u32, due: Option<chrono::NaiveDate>, description: Option<String>) -> Task {
    let due = due.unwrap_or_else(|| chrono::Local::now().date_naive());
    Task::new(title, priority, due).with_description(description.unwrap_or_default())
}

/// Apply a one-shot operation. Returns true when the store changed.
fn apply(store: &mut TaskStore, op: Op) -> Result<bool> {
    match op {
        Op::Add {
            title,
            priority,
            due,
            description,
        } => {
            let task = new_task(title, priority, due, description);
            store.add_task(task.clone()).context("Failed to add task")?;
            println!("{} Added: {}", "✓".green(), task);
            Ok(true)
        }

        Op::Remove { title } => match store.find_by_key(&title) {
            Some(task) => {
                store.remove_task(&task)?;
                println!("{} Removed: {}", "✓".green(), task.title.cyan());
                Ok(true)
            }
            None => {
                println!("{} Task not found: {}", "✗".red(), title);
                Ok(false)
            }
        },

        Op::List => {
            print_tasks(&store.tasks(), "No tasks");
            Ok(false)
        }

        Op::Get { title } => {
            match store.find_by_key(&title) {
                Some(task) => print_detail(&task),
                None => println!("{} Task not found: {}", "✗".red(), title),
            }
            Ok(false)
        }

        Op::Search { term } => {
            let found = store.search_by_title(&term);
            print_tasks(&found, "No matching tasks");
            Ok(false)
        }

        Op::Sort { by, algorithm } => {
            let algorithm = algorithm.map(SortAlgorithm::from).unwrap_or(store.config().sort_algorithm);
            store.sort_with(by.into(), algorithm);
            print_tasks(&store.tasks(), "No tasks");
            Ok(true)
        }

        Op::DeleteByName { text } => {
            let count = store.bulk_delete_by_name_substring(&text)?;
            println!("{} Deleted {} task(s)", "✓".green(), count);
            Ok(count > 0)
        }

        Op::DeleteByPriority { lo, hi } => {
            let count = store.bulk_delete_by_priority_range(lo, hi)?;
            println!("{} Deleted {} task(s)", "✓".green(), count);
            Ok(count > 0)
        }
    }
}

/// Apply one shell command through the worker. Returns false on quit.
async fn apply_remote(handle: &WorkerHandle, file: &Path, command: ShellCommand) -> Result<bool> {
    match command {
        ShellCommand::Op(op) => match op {
            Op::Add {
                title,
                priority,
                due,
                description,
            } => {
                let task = new_task(title, priority, due, description);
                handle.add(task.clone()).await.context("Failed to add task")?;
                println!("{} Added: {}", "✓".green(), task);
            }

            Op::Remove { title } => match handle.find(&title).await? {
                Some(task) => {
                    handle.remove(task).await?;
                    println!("{} Removed: {}", "✓".green(), title.cyan());
                }
                None => println!("{} Task not found: {}", "✗".red(), title),
            },

            Op::List => print_tasks(&handle.list().await?, "No tasks"),

            Op::Get { title } => match handle.find(&title).await? {
                Some(task) => print_detail(&task),
                None => println!("{} Task not found: {}", "✗".red(), title),
            },

            Op::Search { term } => print_tasks(&handle.search(&term).await?, "No matching tasks"),

            Op::Sort { by, algorithm } => {
                handle.sort_with(by.into(), algorithm.map(SortAlgorithm::from)).await?;
                print_tasks(&handle.list().await?, "No tasks");
            }

            Op::DeleteByName { text } => {
                let count = handle.bulk_delete_by_name(&text).await?;
                println!("{} Deleted {} task(s)", "✓".green(), count);
            }

            Op::DeleteByPriority { lo, hi } => {
                let count = handle.bulk_delete_by_priority(lo, hi).await?;
                println!("{} Deleted {} task(s)", "✓".green(), count);
            }
        },

        ShellCommand::Undo => print_history("Undid", "undo", handle.undo().await?),

        ShellCommand::Redo => print_history("Redid", "redo", handle.redo().await?),

        ShellCommand::Save { path } => {
            let path = path.unwrap_or_else(|| file.to_path_buf());
            handle.save(&path).await?;
            println!("{} Saved to {}", "✓".green(), path.display());
        }

        ShellCommand::Load { path } => {
            let path = path.unwrap_or_else(|| file.to_path_buf());
            handle.load(&path).await?;
            println!("{} Loaded from {}", "✓".green(), path.display());
        }

        ShellCommand::Quit => return Ok(false),
    }

    Ok(true)
}

/// Read shell commands from `input` until `quit` or end of input.
async fn shell<R>(store: TaskStore, file: PathBuf, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let (handle, join) = StoreWorker::spawn(store, WorkerConfig::default());

    println!(
        "{} {} ({} to leave, unsaved changes are lost)",
        "→".blue(),
        file.display(),
        "quit".bold()
    );

    let mut lines = input.lines();

    loop {
        print!("{} ", ">".bold());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                continue;
            }
        };

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // help and usage errors both land here
                if let Err(print_err) = e.print() {
                    log::warn!("Failed to print usage: {}", print_err);
                }
                continue;
            }
        };

        match apply_remote(&handle, &file, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
    }

    handle.shutdown().await?;
    join.await.context("Worker panicked")?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = StoreConfig::new().cache_capacity(cli.cache_capacity);
    let mut store = open_store(&cli.file, config)?;

    match cli.command {
        Command::Op(op) => {
            if apply(&mut store, op)? {
                store
                    .save_to_file(&cli.file)
                    .with_context(|| format!("Failed to save {}", cli.file.display()))?;
            }
        }

        Command::Shell => {
            let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
            rt.block_on(shell(store, cli.file, BufReader::new(tokio::io::stdin())))?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
