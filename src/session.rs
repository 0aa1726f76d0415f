use crate::command::{Command, HELP};
use crate::config::Config;
use anyhow::Result;
use gitgud_core::{GitTree, RowBuilder, TuiRenderer};
use std::io::Write;
use tracing::info;

/// A simulated repository plus the display settings used to report on it
pub struct Session {
    tree: GitTree,
    config: Config,
    writer: Box<dyn Write>,
}

impl Session {
    pub fn new(config: Config, writer: Box<dyn Write>) -> Self {
        Self {
            tree: GitTree::new(),
            config,
            writer,
        }
    }

    pub fn tree(&self) -> &GitTree {
        &self.tree
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        info!(?command, head = self.tree.head_id(), "executing");

        match command {
            Command::Commit(parent) => {
                let commit = match parent {
                    Some(parent) => self.tree.add_commit_to(parent)?,
                    None => self.tree.add_commit()?,
                };
                writeln!(
                    self.writer,
                    "created commit {} on branch {}",
                    commit.id(),
                    commit.branch()
                )?;
            }
            Command::Branch(parent) => {
                let commit = match parent {
                    Some(parent) => self.tree.add_commit_new_branch_from(parent)?,
                    None => self.tree.add_commit_new_branch()?,
                };
                writeln!(
                    self.writer,
                    "created commit {} on new branch {}",
                    commit.id(),
                    commit.branch()
                )?;
            }
            Command::Checkout(id) => {
                self.tree.checkout(id)?;
                writeln!(self.writer, "HEAD is now at {}", id)?;
            }
            Command::Merge { parent, other } => {
                let commit = match parent {
                    Some(parent) => self.tree.merge_into(parent, other)?,
                    None => self.tree.merge(other)?,
                };
                let parents: Vec<String> = commit.parent_ids().map(|p| p.to_string()).collect();
                writeln!(
                    self.writer,
                    "created merge commit {} from {}",
                    commit.id(),
                    parents.join(" + ")
                )?;
            }
            Command::Undo => match self.tree.undo()? {
                Some(id) => writeln!(
                    self.writer,
                    "removed commit {}; HEAD is now at {}",
                    id,
                    self.tree.head_id()
                )?,
                None => writeln!(self.writer, "nothing to undo")?,
            },
            Command::Latest(branch) => {
                let commit = match branch {
                    Some(branch) => self.tree.latest_on_branch(branch)?,
                    None => self.tree.latest(),
                };
                writeln!(self.writer, "{}", commit)?;
            }
            Command::Show => write!(self.writer, "{}", self.tree)?,
            Command::Graph => self.write_graph()?,
            Command::Stats => self.write_stats()?,
            Command::Export => writeln!(self.writer, "{}", self.tree.snapshot().to_json()?)?,
            Command::Help => write!(self.writer, "{}", HELP)?,
        }

        Ok(())
    }

    pub fn write_graph(&mut self) -> Result<()> {
        let rows = RowBuilder::new(self.config.max_lanes).build_rows(&self.tree);
        let renderer = TuiRenderer::new(self.config.charset, self.config.color);
        write!(self.writer, "{}", renderer.render_rows(&rows))?;
        Ok(())
    }

    pub fn write_stats(&mut self) -> Result<()> {
        let stats = self.tree.stats();
        writeln!(self.writer, "commits:  {}", stats.total_commits)?;
        writeln!(self.writer, "edges:    {}", stats.total_edges)?;
        writeln!(self.writer, "merges:   {}", stats.merge_commits)?;
        writeln!(self.writer, "forks:    {}", stats.branch_origins)?;
        writeln!(self.writer, "leaves:   {}", stats.leaf_commits)?;
        writeln!(self.writer, "branches: {}", stats.num_branches)?;
        Ok(())
    }

    /// Print stats if the config asks for them
    pub fn finish(&mut self) -> Result<()> {
        if self.config.show_stats {
            self.write_stats()?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
