use std::path::Path;

use anyhow::Context;
use rollout_store::action::parse_actions;
use rollout_store::persist::save_store;
use rollout_store::Console;

use crate::open_store;

/// `rollout dispatch <actions.json>`
pub fn execute(root: &Path, file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading actions: {}", file.display()))?;
    let actions = parse_actions(&content)
        .with_context(|| format!("parsing actions: {}", file.display()))?;

    let mut console = Console::new(open_store(root)?);
    console.dispatch_all(&actions);
    let applied = console.version();
    save_store(root, console.store())?;

    println!("Applied {applied} of {} action(s)", actions.len());
    Ok(())
}
