//! CLI argument parsing for taskstore.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taskstore::{DEFAULT_CACHE_CAPACITY, DEFAULT_DATA_FILE, SortAlgorithm, SortCriterion};

#[derive(Parser)]
#[command(
    name = "taskstore",
    about = "A small task list with undo/redo, sorting and bulk delete",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/taskstore/logs/taskstore.log"
)]
pub struct Cli {
    /// Path to the task file
    #[arg(short = 'f', long, global = true, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Lookup cache capacity
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(flatten)]
    Op(Op),

    /// Interactive session with undo/redo; saves on request
    Shell,
}

/// Operations available both as one-shot commands and inside the shell.
#[derive(Subcommand, Debug)]
pub enum Op {
    /// Add a task
    Add {
        /// Task title (must be unique)
        title: String,

        /// Priority (1 or higher)
        #[arg(short, long, default_value = "1")]
        priority: u32,

        /// Due date as MM/DD/YYYY or YYYY-MM-DD (default: today)
        #[arg(short, long, value_parser = parse_date)]
        due: Option<NaiveDate>,

        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Remove a task by title
    Remove {
        /// Task title
        title: String,
    },

    /// List tasks in store order
    List,

    /// Show a task by title
    Get {
        /// Task title
        title: String,
    },

    /// Find tasks whose title contains text, ignoring case
    Search {
        /// Text to look for
        term: String,
    },

    /// Reorder the stored tasks
    Sort {
        /// Field to sort by
        #[arg(value_enum)]
        by: SortField,

        /// Sorting algorithm (default: merge)
        #[arg(short, long, value_enum)]
        algorithm: Option<AlgorithmArg>,
    },

    /// Delete every task whose title contains text (case-sensitive)
    DeleteByName {
        /// Text to match
        text: String,
    },

    /// Delete every task with priority in an inclusive range
    DeleteByPriority {
        /// Lowest priority to delete
        lo: u32,

        /// Highest priority to delete
        hi: u32,
    },
}

/// Commands accepted by the interactive shell.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    #[command(flatten)]
    Op(Op),

    /// Undo the last add or remove
    Undo,

    /// Redo the last undone change
    Redo,

    /// Save to the task file, or to PATH
    Save { path: Option<PathBuf> },

    /// Replace all tasks from the task file, or from PATH
    Load { path: Option<PathBuf> },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortField {
    Priority,
    DueDate,
}

impl From<SortField> for SortCriterion {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Priority => SortCriterion::Priority,
            SortField::DueDate => SortCriterion::DueDate,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AlgorithmArg {
    Quick,
    Merge,
}

impl From<AlgorithmArg> for SortAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Quick => SortAlgorithm::Quick,
            AlgorithmArg::Merge => SortAlgorithm::Merge,
        }
    }
}

/// Parse `MM/DD/YYYY` or `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{}': expected MM/DD/YYYY or YYYY-MM-DD", s))
}

/// Split a shell line into words, honoring single and double quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
