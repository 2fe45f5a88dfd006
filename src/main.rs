use anyhow::Result;
use clap::{Parser, Subcommand};
use minigit::areas::repository::Repository;
use minigit::errors::RepositoryError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    about = "A minimal local version-control system",
    long_about = "A minimal local version-control system with content-addressed storage, \
    branches, a staging area and three-way merges over first-parent history.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        short = 'C',
        long = "repository",
        global = true,
        help = "Run as if started in this directory"
    )]
    repository: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a repository in the working directory")]
    Init,
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "Stages the current content of each file. A file whose content matches \
        the current commit is unstaged instead."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        files: Vec<String>,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file and stage its removal",
        long_about = "Unstages the file. If the current commit tracks it, the file is also \
        deleted from the working directory and staged for removal."
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and untracked files")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore files or switch branches",
        long_about = "checkout <branch>           switch to a branch\n\
        checkout -- <file>          restore a file from the current commit\n\
        checkout <commit> -- <file> restore a file from the given commit"
    )]
    Checkout {
        #[arg(help = "A branch name, or a commit id when a file is given")]
        target: Option<String>,
        #[arg(last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = match cli.repository {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let repository = Repository::new(&path, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::Init => repository.init()?,
        Commands::Add { files } => {
            for file in files {
                repository.add(file)?;
            }
        }
        Commands::Commit { message } => {
            repository.commit(message)?;
        }
        Commands::Rm { file } => repository.rm(file)?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => {
            repository.find(message)?;
        }
        Commands::Status => {
            repository.status()?;
        }
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(branch)?,
            (None, Some(file)) => repository.checkout_file(file)?,
            (Some(commit), Some(file)) => repository.checkout_file_at(commit, file)?,
            (None, None) => {
                return Err(RepositoryError::Validation("incorrect operands".to_string()).into());
            }
        },
        Commands::Branch { name } => repository.branch(name)?,
        Commands::RmBranch { name } => repository.rm_branch(name)?,
        Commands::Reset { commit } => {
            repository.reset(commit)?;
        }
        Commands::Merge { branch } => {
            repository.merge(branch)?;
        }
    }

    Ok(())
}
