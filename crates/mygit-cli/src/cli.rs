use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "mygit",
    about = "mygit: a small content-addressed version control system",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run as if started in DIR
    #[arg(short = 'C', long = "root", global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository or repair an existing one
    Init(InitArgs),
    /// Compute an object fingerprint, optionally storing the blob
    HashObject(HashObjectArgs),
    /// Show an object's content, size or type
    CatFile(CatFileArgs),
    /// Snapshot the working directory as tree objects
    WriteTree,
    /// List the entries of a tree object
    LsTree(LsTreeArgs),
    /// Stage files or directories
    Add(AddArgs),
    /// Record the working directory as a new commit
    Commit(CommitArgs),
    /// Show commit history from HEAD
    Log(LogArgs),
    /// Replace the working directory with a commit's snapshot
    Checkout(CheckoutArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the root)
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HashObjectArgs {
    /// Write the blob into the object store
    #[arg(short = 'w')]
    pub write: bool,
    pub file: PathBuf,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CatFileMode {
    /// Print the payload
    #[arg(short = 'p')]
    pub pretty: bool,
    /// Print the payload size in bytes
    #[arg(short = 's')]
    pub size: bool,
    /// Print the object type
    #[arg(short = 't')]
    pub kind: bool,
}

#[derive(Args, Debug)]
pub struct CatFileArgs {
    #[command(flatten)]
    pub mode: CatFileMode,
    pub object: String,
}

#[derive(Args, Debug)]
pub struct LsTreeArgs {
    /// Print entry names only
    #[arg(long)]
    pub name_only: bool,
    pub tree: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CommitArgs {
    #[arg(short, long, default_value = "Default commit message")]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Show at most N commits
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    pub commit: String,
}
