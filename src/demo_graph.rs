use anyhow::Result;
use gitgud_core::{Charset, GitTree, RowBuilder, TuiRenderer};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("GitGud Graph Demo");
    println!("=================\n");

    // commit, fork a branch, go back, commit again, merge the branch in
    let mut tree = GitTree::new();
    let c1 = tree.add_commit()?.id();
    let c2 = tree.add_commit_new_branch()?.id();
    tree.checkout(c1)?;
    tree.add_commit()?;
    tree.merge(c2)?;

    println!("Tree statistics:");
    let stats = tree.stats();
    println!("  Total commits: {}", stats.total_commits);
    println!("  Merge commits: {}", stats.merge_commits);
    println!("  Branches:      {}", stats.num_branches);
    println!();

    println!("Commits:");
    tree.print();
    println!();

    let rows = RowBuilder::new(8).build_rows(&tree);
    let renderer = TuiRenderer::new(Charset::Unicode, false);

    println!("Commit Graph:");
    println!("─────────────");
    print!("{}", renderer.render_rows(&rows));

    Ok(())
}
