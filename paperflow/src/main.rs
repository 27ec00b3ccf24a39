//! Conference paper review-workflow CLI.
//!
//! Reads `.paperflow/board.json` (papers and chair assignments) and
//! `.paperflow/config.toml` (deadline, lookup mode), derives each paper's
//! workflow stage and answers author eligibility questions. Eligibility
//! commands report through the exit code (see `exit_codes`).

use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use paperflow::core::types::{Decision, PaperId};
use paperflow::decide::decide;
use paperflow::eligibility::{Verdict, check_delete, check_submit};
use paperflow::error::{LookupError, PaperError};
use paperflow::exit_codes;
use paperflow::io::clock::{Clock, FixedClock, SystemClock};
use paperflow::io::directory::{ChairDirectory, LookupMode};
use paperflow::io::init::{InitOptions, init_workspace};
use paperflow::logging;
use paperflow::status::{render_status, render_table, status_lines};
use paperflow::workspace::Workspace;

#[derive(Parser)]
#[command(
    name = "paperflow",
    version,
    about = "Conference paper review-workflow status and author eligibility"
)]
struct Cli {
    /// Project root containing `.paperflow/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Fail on chair lookup errors instead of treating them as unassigned.
    #[arg(long, global = true)]
    strict: bool,

    /// Evaluate deadlines at this RFC 3339 instant instead of the current time.
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Debug-level diagnostics on stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.paperflow/` with an empty board and default config.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Print each paper's id, derived workflow stage and title.
    Status,
    /// Print the title/category/acceptance table.
    Table,
    /// Print the author actions enabled for an optional selected paper (JSON).
    Actions {
        #[arg(long)]
        paper: Option<u32>,
    },
    /// Exit 0 if the configured author may submit or modify papers.
    CanSubmit,
    /// Exit 0 if the configured author may delete the paper.
    CanDelete { paper: u32 },
    /// Record the final decision on a paper awaiting one.
    Decide {
        paper: u32,
        #[arg(value_enum)]
        decision: DecisionArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DecisionArg {
    Accept,
    Decline,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => Decision::Accept,
            DecisionArg::Decline => Decision::Decline,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            if is_lookup_failure(&err) {
                exit_codes::LOOKUP_FAILED
            } else {
                exit_codes::INVALID
            }
        }
    };
    process::exit(code);
}

/// Loaded workspace plus the collaborators every board command needs.
struct Session {
    workspace: Workspace,
    clock: Rc<dyn Clock>,
    directory: Box<dyn ChairDirectory>,
    mode: LookupMode,
}

impl Session {
    fn open(root: &Path, strict: bool, now: Option<DateTime<Utc>>) -> Result<Self> {
        let clock: Rc<dyn Clock> = match now {
            Some(at) => Rc::new(FixedClock::new(at)),
            None => Rc::new(SystemClock),
        };
        let workspace = Workspace::load(root)?;
        let mode = workspace.lookup_mode(strict);
        let directory = workspace.directory(Rc::clone(&clock));
        Ok(Self {
            workspace,
            clock,
            directory,
            mode,
        })
    }
}

fn run(cli: Cli) -> Result<i32> {
    let Cli {
        root,
        strict,
        now,
        command,
        ..
    } = cli;

    if let Command::Init { force } = command {
        let paths = init_workspace(&root, &InitOptions { force })?;
        println!("initialized {}", paths.dir.display());
        return Ok(exit_codes::OK);
    }

    let mut session = Session::open(&root, strict, now)?;
    match command {
        Command::Init { .. } => Ok(exit_codes::OK),
        Command::Status => {
            let lines = status_lines(
                &session.workspace.board.papers,
                session.directory.as_ref(),
                session.mode,
            )?;
            print!("{}", render_status(&lines));
            Ok(exit_codes::OK)
        }
        Command::Table => {
            print!("{}", render_table(&session.workspace.board.papers));
            Ok(exit_codes::OK)
        }
        Command::Actions { paper } => {
            let author = session.workspace.author()?;
            let actions = author.actions(
                session.clock.as_ref(),
                paper.map(PaperId),
                session.directory.as_ref(),
                session.mode,
            )?;
            println!(
                "{}",
                serde_json::to_string_pretty(&actions).context("serialize actions")?
            );
            Ok(exit_codes::OK)
        }
        Command::CanSubmit => {
            let author = session.workspace.author()?;
            Ok(report(check_submit(&author, session.clock.as_ref())))
        }
        Command::CanDelete { paper } => {
            let author = session.workspace.author()?;
            let verdict = check_delete(&author, PaperId(paper), session.clock.as_ref())?;
            Ok(report(verdict))
        }
        Command::Decide { paper, decision } => {
            let decision = Decision::from(decision);
            decide(
                &mut session.workspace.board,
                PaperId(paper),
                decision,
                session.directory.as_ref(),
                session.mode,
            )?;
            session.workspace.save_board()?;
            println!("paper {} decided: {}", paper, decision.outcome());
            Ok(exit_codes::OK)
        }
    }
}

fn report(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Allowed => {
            println!("allowed");
            exit_codes::OK
        }
        Verdict::Denied(reason) => {
            println!("denied: {}", reason);
            exit_codes::DENIED
        }
    }
}

/// True if the error chain contains a chair lookup failure.
fn is_lookup_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<LookupError>()
            || matches!(cause.downcast_ref::<PaperError>(), Some(PaperError::Lookup(_)))
    })
}
