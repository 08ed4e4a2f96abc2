//! Push command
//!
//! Command-line rendition of the "push to LMS" page.

use anyhow::{Context, Result};
use clap::Args;

use super::Settings;
use cgx_core::git::SystemGit;
use cgx_core::push::{push_to_lms, PushPage};
use cgx_core::types::CourseLocator;
use cgx_core::GitExporter;

/// Arguments for the push command
#[derive(Debug, Args)]
pub struct PushArgs {
    /// Course locator, `org/course/run`
    pub course: String,

    /// Acting user
    #[arg(long, short)]
    pub user: String,

    /// Run the export instead of only showing the page
    #[arg(long)]
    pub action: bool,

    /// Print the page state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the push command
pub fn execute(args: PushArgs, settings: &Settings) -> Result<()> {
    let course = CourseLocator::parse(&args.course)
        .with_context(|| format!("Invalid course '{}'", args.course))?;

    let store = settings.open_store()?;
    let git = SystemGit::new();
    let exporter = GitExporter::new(&settings.config, &git, &store, &store);

    let page = push_to_lms(&exporter, &store, &store, &args.user, &course, args.action)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        render(&page);
    }
    Ok(())
}

fn render(page: &PushPage) {
    use colored::Colorize;

    println!("{}", format!("Export {} to git", page.course).bold().underline());
    match &page.git_url {
        Some(url) => println!("Git URL: {}", url.cyan()),
        None => println!(
            "{} No git URL stored; set one with '{}'",
            "⚠".yellow(),
            format!("cgx course set-url {} <url>", page.course).cyan()
        ),
    }

    let Some(status) = page.status else {
        return;
    };

    println!();
    if page.failed {
        println!("{} Export failed ({})", "✗".red(), status);
    } else {
        println!("{} Export succeeded", "✓".green());
    }
    if !page.msg.is_empty() {
        println!("\n{}", page.msg.dimmed());
    }
}
