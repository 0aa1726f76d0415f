use gitgud_core::{BranchId, CommitId};
use std::str::FromStr;
use thiserror::Error;

/// One instruction of the simulator's command language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `commit [parent]`
    Commit(Option<CommitId>),
    /// `branch [parent]`
    Branch(Option<CommitId>),
    /// `checkout <id>`
    Checkout(CommitId),
    /// `merge <other>` or `merge <parent> <other>`
    Merge {
        parent: Option<CommitId>,
        other: CommitId,
    },
    Undo,
    /// `latest [branch]`
    Latest(Option<BranchId>),
    Show,
    Graph,
    Stats,
    Export,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'; try 'help'")]
    Unknown(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("too many arguments for '{0}'")]
    TooManyArguments(&'static str),
}

pub const HELP: &str = "\
commands:
  commit [parent]          extend HEAD (or parent) on its branch
  branch [parent]          start a new branch at HEAD (or parent)
  checkout <id>            move HEAD to a commit
  merge [parent] <other>   merge other into HEAD (or parent)
  undo                     remove the most recent commit
  latest [branch]          show the newest commit (on a branch)
  show                     list every commit
  graph                    draw the commit graph
  stats                    summarize the tree
  export                   print the tree as JSON
  help                     show this message
";

fn number<T: FromStr>(word: &str) -> Result<T, ParseCommandError> {
    word.parse()
        .map_err(|_| ParseCommandError::InvalidNumber(word.to_string()))
}

fn optional<T: FromStr>(
    command: &'static str,
    args: &[&str],
) -> Result<Option<T>, ParseCommandError> {
    match args {
        [] => Ok(None),
        [word] => number(word).map(Some),
        _ => Err(ParseCommandError::TooManyArguments(command)),
    }
}

fn none(command: &'static str, args: &[&str]) -> Result<(), ParseCommandError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ParseCommandError::TooManyArguments(command))
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = words.split_first().ok_or(ParseCommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "commit" => Command::Commit(optional("commit", args)?),
            "branch" => Command::Branch(optional("branch", args)?),
            "checkout" => match args {
                [id] => Command::Checkout(number(id)?),
                [] => {
                    return Err(ParseCommandError::MissingArgument {
                        command: "checkout",
                        argument: "commit id",
                    })
                }
                _ => return Err(ParseCommandError::TooManyArguments("checkout")),
            },
            "merge" => match args {
                [other] => Command::Merge {
                    parent: None,
                    other: number(other)?,
                },
                [parent, other] => Command::Merge {
                    parent: Some(number(parent)?),
                    other: number(other)?,
                },
                [] => {
                    return Err(ParseCommandError::MissingArgument {
                        command: "merge",
                        argument: "commit id",
                    })
                }
                _ => return Err(ParseCommandError::TooManyArguments("merge")),
            },
            "undo" => none("undo", args).map(|_| Command::Undo)?,
            "latest" => Command::Latest(optional("latest", args)?),
            "show" => none("show", args).map(|_| Command::Show)?,
            "graph" => none("graph", args).map(|_| Command::Graph)?,
            "stats" => none("stats", args).map(|_| Command::Stats)?,
            "export" => none("export", args).map(|_| Command::Export)?,
            "help" => Command::Help,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

/// Strip a trailing `#` comment and surrounding whitespace
pub fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default().trim()
}
