use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use mygit_sdk::{CatMode, CatOutput, ObjectId, Repository, SdkError};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(&root, args, format),
        Command::HashObject(args) => cmd_hash_object(&root, args, format),
        Command::CatFile(args) => cmd_cat_file(&root, args, format),
        Command::WriteTree => cmd_write_tree(&root, format),
        Command::LsTree(args) => cmd_ls_tree(&root, args, format),
        Command::Add(args) => cmd_add(&root, args, format),
        Command::Commit(args) => cmd_commit(&root, args, format),
        Command::Log(args) => cmd_log(&root, args, format),
        Command::Checkout(args) => cmd_checkout(&root, args, format),
    }
}

fn open(root: &Path) -> anyhow::Result<Repository> {
    Repository::open(root).with_context(|| format!("cannot open repository at {}", root.display()))
}

fn parse_id(input: &str) -> anyhow::Result<ObjectId> {
    Ok(input.trim().parse::<ObjectId>().map_err(SdkError::from)?)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_init(root: &Path, args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let target: PathBuf = match args.path {
        Some(path) if path.is_absolute() => path,
        Some(path) => root.join(path),
        None => root.to_path_buf(),
    };
    let (repo, report) = Repository::init(&target)?;
    if format == OutputFormat::Json {
        return print_json(&serde_json::to_value(&report)?);
    }
    let meta = repo.layout().meta_dir();
    if !report.reinitialized {
        println!(
            "{} Initialized empty mygit repository in {}",
            "✓".green().bold(),
            meta.display().to_string().bold()
        );
    } else if report.created.is_empty() {
        println!("Reinitialized existing mygit repository in {}", meta.display());
    } else {
        println!(
            "{} Repaired mygit repository in {} (created: {})",
            "✓".green().bold(),
            meta.display().to_string().bold(),
            report.created.join(", ").yellow()
        );
    }
    Ok(())
}

fn cmd_hash_object(root: &Path, args: HashObjectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id = repo.hash_object(&args.file, args.write)?;
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "written": args.write })),
        OutputFormat::Text => {
            println!("{id}");
            Ok(())
        }
    }
}

fn cmd_cat_file(root: &Path, args: CatFileArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id = parse_id(&args.object)?;
    let mode = if args.mode.pretty {
        CatMode::Pretty
    } else if args.mode.size {
        CatMode::Size
    } else {
        CatMode::Type
    };
    let output = repo.cat_file(mode, &id)?;
    if format == OutputFormat::Json {
        let value = match &output {
            CatOutput::Pretty(bytes) => json!({ "id": id, "content": String::from_utf8_lossy(bytes) }),
            CatOutput::Size(size) => json!({ "id": id, "size": size }),
            CatOutput::Type(kind) => json!({ "id": id, "type": kind }),
        };
        return print_json(&value);
    }
    match output {
        CatOutput::Pretty(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
        CatOutput::Size(size) => println!("{size}"),
        CatOutput::Type(kind) => println!("{kind}"),
    }
    Ok(())
}

fn cmd_write_tree(root: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id = repo.write_tree()?;
    match format {
        OutputFormat::Json => print_json(&json!({ "tree": id })),
        OutputFormat::Text => {
            println!("{id}");
            Ok(())
        }
    }
}

fn cmd_ls_tree(root: &Path, args: LsTreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id = parse_id(&args.tree)?;
    let tree = repo.ls_tree(&id)?;
    if format == OutputFormat::Json {
        let entries: Vec<_> = tree
            .entries
            .iter()
            .map(|e| {
                json!({
                    "mode": e.mode.to_string(),
                    "type": e.kind(),
                    "id": e.object_id,
                    "name": e.name,
                })
            })
            .collect();
        return print_json(&json!({ "tree": id, "entries": entries }));
    }
    for entry in &tree.entries {
        if args.name_only {
            println!("{}", entry.name);
        } else {
            let name = if entry.is_tree() {
                entry.name.blue().bold().to_string()
            } else {
                entry.name.clone()
            };
            println!("{} {} {} {}", entry.mode, entry.kind(), entry.object_id, name);
        }
    }
    Ok(())
}

fn cmd_add(root: &Path, args: AddArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let staged = repo.stage(args.paths.as_slice())?;
    if format == OutputFormat::Json {
        return print_json(&serde_json::to_value(&staged)?);
    }
    for entry in &staged {
        println!("  {} {}", "staged:".green(), entry.path);
    }
    if staged.is_empty() {
        println!("Nothing to stage.");
    }
    Ok(())
}

fn cmd_commit(root: &Path, args: CommitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let outcome = repo.commit(&args.message)?;
    if format == OutputFormat::Json {
        return print_json(&serde_json::to_value(&outcome)?);
    }
    let kind = if outcome.parent.is_none() { " (root-commit)" } else { "" };
    println!(
        "{} [{}{}] {}",
        "✓".green().bold(),
        outcome.id.short_hex().yellow(),
        kind,
        outcome.message
    );
    println!("  Commit: {}", outcome.id.to_string().yellow());
    println!("  Tree:   {}", outcome.tree.to_string().dimmed());
    Ok(())
}

fn cmd_log(root: &Path, args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let mut entries = repo.log()?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    if format == OutputFormat::Json {
        return print_json(&serde_json::to_value(&entries)?);
    }
    if entries.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    for entry in &entries {
        let commit = &entry.commit;
        if args.oneline {
            println!("{} {}", entry.id.short_hex().yellow(), commit.message);
            continue;
        }
        println!("{} {}", "Commit:".bold(), entry.id.to_string().yellow());
        if let Some(parent) = &commit.parent {
            println!("Parent: {}", parent.to_string().dimmed());
        }
        println!("Committer: {}", commit.committer);
        println!("Message: {}", commit.message);
        println!("Timestamp: {}", commit.timestamp);
        println!();
    }
    Ok(())
}

fn cmd_checkout(root: &Path, args: CheckoutArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id = parse_id(&args.commit)?;
    let report = repo.checkout(&id)?;
    if format == OutputFormat::Json {
        return print_json(&json!({ "commit": id, "report": report }));
    }
    println!(
        "{} Checked out {} ({} files, {} directories)",
        "✓".green().bold(),
        id.to_string().yellow(),
        report.files,
        report.directories
    );
    Ok(())
}
