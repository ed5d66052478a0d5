use anyhow::Result;
use colored::Colorize;
use rackd_router::navigate;

/// Print where a link to `target` on page `current` leads
pub fn execute(current: &str, target: &str) -> Result<()> {
    match navigate(current, target) {
        Some(resolved) => println!("{}", resolved),
        None => println!("{}", "(no navigation)".dimmed()),
    }
    Ok(())
}
