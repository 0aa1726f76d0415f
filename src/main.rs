mod command;
mod config;
mod session;

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use command::{strip_comment, Command};
use config::Config;
use gitgud_core::Charset;
use session::Session;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitgud")]
#[command(about = "Simulate a commit graph: commits, branches, merges and undo", long_about = None)]
struct Cli {
    /// Config file (defaults to ./gitgud.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Draw the graph with ASCII characters only
    #[arg(long, global = true)]
    ascii: bool,
    /// Color graph lanes with ANSI escapes
    #[arg(long, global = true)]
    color: bool,
    /// Maximum number of graph lanes
    #[arg(long, global = true, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_lanes: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute commands from a script, one per line
    Run {
        /// Path to the script
        script: PathBuf,
    },
    /// Read commands interactively from stdin
    Repl,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let cwd = std::env::current_dir()?;
        let mut config = Config::discover(self.config.as_deref(), &cwd)?;
        if self.ascii {
            config.charset = Charset::Ascii;
        }
        if self.color {
            config.color = true;
        }
        if let Some(max_lanes) = self.max_lanes {
            config.max_lanes = max_lanes;
        }
        Ok(config)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_script(session: &mut Session, script: &Path) -> Result<()> {
    let text = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    run_lines(session, &text)
}

/// Execute script text line by line, stopping at the first failure
fn run_lines(session: &mut Session, text: &str) -> Result<()> {
    for (index, raw) in text.lines().enumerate() {
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }
        let command: Command = line
            .parse()
            .with_context(|| format!("line {}: '{}'", index + 1, line))?;
        session
            .execute(command)
            .with_context(|| format!("line {}: '{}'", index + 1, line))?;
    }

    Ok(())
}

/// Read commands until EOF or `quit`; failed commands are reported on
/// `errors` and the loop carries on
fn run_repl(
    session: &mut Session,
    mut input: impl BufRead,
    prompt: &mut impl Write,
    errors: &mut impl Write,
) -> Result<()> {
    loop {
        write!(prompt, "gitgud ({})> ", session.tree().head_id())?;
        prompt.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(prompt)?;
            break;
        }

        let line = strip_comment(&line);
        match line {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }

        let result = line
            .parse::<Command>()
            .map_err(anyhow::Error::from)
            .and_then(|command| session.execute(command));
        if let Err(e) = result {
            writeln!(errors, "error: {}", e)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    init_logging(&config.log_level);

    let mut session = Session::new(config, Box::new(io::stdout()));

    match &cli.command {
        Commands::Run { script } => run_script(&mut session, script)?,
        Commands::Repl => run_repl(
            &mut session,
            io::stdin().lock(),
            &mut io::stdout(),
            &mut io::stderr(),
        )?,
    }

    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(Config::default(), Box::new(io::sink()))
    }

    #[test]
    fn test_script_stops_at_failing_line() {
        let mut session = session();
        let script = "# build a little history\ncommit\ncheckout 9  # no such commit\ncommit\n";

        let err = run_lines(&mut session, script).unwrap_err();

        assert_eq!(format!("{:#}", err), "line 3: 'checkout 9': commit 9 does not exist");
        // line 4 never ran
        assert_eq!(session.tree().num_commits(), 2);
        assert_eq!(session.tree().head_id(), 1);
    }

    #[test]
    fn test_script_parse_error_has_line_number() {
        let mut session = session();

        let err = run_lines(&mut session, "commit\n\nfrobnicate\n").unwrap_err();

        assert!(err.to_string().starts_with("line 3: 'frobnicate'"));
        assert_eq!(session.tree().num_commits(), 2);
    }

    #[test]
    fn test_script_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.gg");
        fs::write(&path, "commit\nbranch  # fork\ncheckout 1\ncommit\nmerge 2\n").unwrap();
        let mut session = session();

        run_script(&mut session, &path).unwrap();

        assert_eq!(session.tree().num_commits(), 5);
        assert!(session.tree().head().is_merge_commit());
        assert!(run_script(&mut session, &dir.path().join("missing.gg")).is_err());
    }

    #[test]
    fn test_repl_reports_errors_and_continues() {
        let mut session = session();
        let input = "commit\ncheckout 9\nbogus\n\ncommit # again\nquit\ncommit\n".as_bytes();
        let mut prompt = Vec::new();
        let mut errors = Vec::new();

        run_repl(&mut session, input, &mut prompt, &mut errors).unwrap();

        assert_eq!(session.tree().num_commits(), 3);
        let errors = String::from_utf8(errors).unwrap();
        assert_eq!(errors.lines().count(), 2);
        assert!(errors.starts_with("error: commit 9 does not exist\n"));
        assert!(String::from_utf8(prompt).unwrap().starts_with("gitgud (0)> gitgud (1)> "));
    }

    #[test]
    fn test_repl_ends_at_eof() {
        let mut session = session();
        let mut prompt = Vec::new();

        run_repl(&mut session, "commit\n".as_bytes(), &mut prompt, &mut io::sink()).unwrap();

        assert_eq!(session.tree().num_commits(), 2);
        assert!(String::from_utf8(prompt).unwrap().ends_with("gitgud (1)> \n"));
    }

    #[test]
    fn test_zero_max_lanes_rejected() {
        assert!(Cli::try_parse_from(["gitgud", "--max-lanes", "0", "repl"]).is_err());

        let cli = Cli::try_parse_from(["gitgud", "--max-lanes", "3", "repl"]).unwrap();
        assert_eq!(cli.max_lanes, Some(3));
    }
}
