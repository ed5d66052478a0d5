use anyhow::Result;
use colored::Colorize;

use crate::config::{Config, RouteKind};

/// List the route table in match order
pub fn execute(config: &Config) -> Result<()> {
    let routes = config.route_table();
    let width = routes.iter().map(|r| r.path.len()).max().unwrap_or(0);

    for (idx, entry) in routes.iter().enumerate() {
        let action = match entry.kind()? {
            RouteKind::View(view) => format!("{} <{}>", "view".green(), view),
            RouteKind::Redirect(target) => format!("{} {}", "redirect".yellow(), target),
        };
        println!("{:>3}. {:<width$}  {}", idx + 1, entry.path, action, width = width);

        for (arg, attribute) in &entry.attributes {
            println!("     {:<width$}    ${} → {}", "", arg, attribute, width = width);
        }
    }

    match config.fallback_view() {
        Some(view) => println!("{} <{}>", "fallback".dimmed(), view),
        None => println!("{}", "no fallback".dimmed()),
    }
    println!(
        "{} {}",
        "max redirects".dimmed(),
        config.router.max_redirects
    );

    Ok(())
}
