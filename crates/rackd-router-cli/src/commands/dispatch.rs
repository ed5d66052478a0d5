use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::shell::{Outcome, Report, Shell};

/// Dispatch `path` as if the dashboard had just been opened on it
pub fn execute(config: &Config, path: &str, json: bool) -> Result<()> {
    let shell = Shell::new(config, path)?;
    let report = shell
        .run()
        .with_context(|| format!("Failed to dispatch {}", path))?;
    print(&report, json)
}

/// Open the dashboard on `current`, then request navigation to `target`
pub fn execute_goto(config: &Config, current: &str, target: &str, json: bool) -> Result<()> {
    let shell = Shell::new(config, current)?;
    let report = shell
        .goto(target)
        .with_context(|| format!("Failed to navigate from {} to {}", current, target))?;
    print(&report, json)
}

fn print(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{} {}", "→".cyan(), report.requested.bold());

    for path in &report.history {
        println!("  {} {}", "replace".yellow(), path);
    }

    match report.outcome {
        Outcome::Route => {
            let route = report.route.as_deref().unwrap_or_default();
            println!("  {} {}", "route".green(), route);
        }
        Outcome::Fallback => println!("  {}", "no route matched, fallback".yellow()),
        Outcome::Unmatched => println!("  {}", "no route matched".red()),
        Outcome::NoNavigation => println!("  {}", "no navigation".dimmed()),
    }

    if let Some(view) = &report.view {
        let attributes: Vec<String> = view
            .attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, value))
            .collect();
        println!("  {} <{}{}>", "view".green(), view.view.bold(), attributes.concat());
    }

    println!("  {} {}", "location".cyan(), report.location);
    Ok(())
}
