use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roadmap", about = "Render a task roadmap as a Graphviz diagram")]
pub struct Cli {
    /// Path to the SQLite database [default: ~/.roadmap/roadmap.db]
    #[arg(long, env = "ROADMAP_DB", global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create database and tables (idempotent)
    Init,

    /// Add a task
    Add {
        /// Task id
        id: String,
        /// Task title
        title: String,
        /// Mark the task as a bug
        #[arg(long)]
        bug: bool,
        /// Mark the task as focused
        #[arg(long)]
        focused: bool,
        /// Make the task a branch of this task
        #[arg(short, long)]
        branch_of: Option<String>,
    },

    /// Mark a task as blocking another
    Block {
        /// The blocking task
        blocker: String,
        /// The blocked task
        blocked: String,
    },

    /// Print the roadmap as Graphviz DOT
    Render {
        /// Read rows from a JSON document instead of the database
        #[arg(short, long)]
        input: Option<String>,
        /// Only draw what leads up to this task
        #[arg(short, long)]
        goal: Option<String>,
        /// Label style (html, record)
        #[arg(long, default_value = "html")]
        style: String,
        /// Wrap titles at this many columns
        #[arg(long, default_value_t = roadmap::render::DEFAULT_WRAP_WIDTH)]
        wrap_width: usize,
        /// Render again whenever the input changes
        #[arg(long)]
        watch: bool,
    },
}
