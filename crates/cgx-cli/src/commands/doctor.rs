//! Doctor command
//!
//! Diagnose git, the export root and course storage.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::Path;

use super::Settings;
use cgx_core::git::SystemGit;

/// Arguments for the doctor command
#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Show fix suggestions for every check
    #[arg(long)]
    pub suggestions: bool,
}

/// Check result
struct CheckResult {
    name: String,
    passed: bool,
    message: String,
    suggestion: Option<String>,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            suggestion: None,
        }
    }

    fn fail(name: &str, message: &str, suggestion: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    fn warn(name: &str, message: &str, suggestion: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: format!("⚠ {}", message),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    fn is_warning(&self) -> bool {
        self.passed && self.message.starts_with('⚠')
    }
}

/// Execute the doctor command
pub fn execute(args: DoctorArgs, settings: &Settings) -> Result<()> {
    use colored::Colorize;

    println!("\n{}", "1. System Environment".bold().underline());
    let mut results = check_system_environment(&SystemGit::new());
    print_results(&results, args.suggestions);

    println!("\n{}", "2. Export Root".bold().underline());
    let export = check_export_root(&settings.config.export.repo_export_dir);
    print_results(&export, args.suggestions);
    results.extend(export);

    println!("\n{}", "3. Course Storage".bold().underline());
    let storage = check_storage(&settings.data_dir());
    print_results(&storage, args.suggestions);
    results.extend(storage);

    let warnings: Vec<_> = results.iter().filter(|r| r.is_warning()).collect();
    let errors: Vec<_> = results.iter().filter(|r| !r.passed).collect();

    println!(
        "\n{}: {} warnings, {} errors",
        "Summary".bold(),
        warnings.len().to_string().yellow(),
        errors.len().to_string().red()
    );

    if !errors.is_empty() {
        println!("\n{}", "✗ Errors:".red());
        for result in &errors {
            println!("  - {}: {}", result.name, result.message);
            if let Some(suggestion) = &result.suggestion {
                println!("    Fix: {}", suggestion);
            }
        }
    }

    if errors.is_empty() && warnings.is_empty() {
        println!("\n{} All checks passed!", "✓".green());
    }

    Ok(())
}

fn print_results(results: &[CheckResult], suggestions: bool) {
    use colored::Colorize;

    for result in results {
        let status = if !result.passed {
            "✗".red()
        } else if result.is_warning() {
            "⚠".yellow()
        } else {
            "✓".green()
        };

        println!("   {} {}: {}", status, result.name, result.message);

        if suggestions || result.is_warning() {
            if let Some(suggestion) = &result.suggestion {
                println!("     {}", suggestion.dimmed());
            }
        }
    }
}

fn check_system_environment(git: &SystemGit) -> Vec<CheckResult> {
    let mut results = vec![CheckResult::ok("cgx version", env!("CARGO_PKG_VERSION"))];

    match git.version() {
        Some(version) => results.push(CheckResult::ok("Git version", &version)),
        None => results.push(CheckResult::fail(
            "Git",
            "not found",
            Some("Install git: https://git-scm.com/"),
        )),
    }

    results
}

fn check_export_root(root: &Path) -> Vec<CheckResult> {
    let name = "Export root";
    let shown = root.display().to_string();

    if !root.is_dir() {
        return vec![CheckResult::fail(
            name,
            &format!("{} does not exist", shown),
            Some("Create it or pass --export-dir / set CGX_EXPORT_DIR"),
        )];
    }

    // Exports clone into the root, so it must be writable
    let probe = root.join(".cgx-doctor-probe");
    let writable = fs::write(&probe, b"").and_then(|_| fs::remove_file(&probe));
    match writable {
        Ok(()) => vec![CheckResult::ok(name, &format!("{} (writable)", shown))],
        Err(e) => vec![CheckResult::fail(
            name,
            &format!("{} is not writable: {}", shown, e),
            Some("Give the exporting user write access"),
        )],
    }
}

fn check_storage(data_dir: &Path) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let shown = data_dir.display().to_string();

    if !data_dir.join("courses").is_dir() {
        results.push(CheckResult::warn(
            "Data directory",
            &format!("{} has no courses yet", shown),
            Some("Store one with 'cgx course import <file>'"),
        ));
        return results;
    }
    results.push(CheckResult::ok("Data directory", &shown));

    let users = data_dir.join("users.toml");
    if !users.exists() {
        results.push(CheckResult::warn(
            "users.toml",
            "not found",
            Some("Commits will use the default identity; add users with 'cgx user add'"),
        ));
        return results;
    }

    match fs::read_to_string(&users) {
        Ok(content) => match toml::from_str::<toml::Value>(&content) {
            Ok(_) => results.push(CheckResult::ok("users.toml", "valid")),
            Err(e) => results.push(CheckResult::fail(
                "users.toml",
                &format!("invalid TOML: {}", e),
                Some("Fix syntax errors in users.toml"),
            )),
        },
        Err(_) => results.push(CheckResult::fail("users.toml", "cannot read", None)),
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "message");
        assert!(result.passed);
        assert!(!result.is_warning());
        assert!(result.suggestion.is_none());
    }

    #[test]
    fn test_check_result_fail() {
        let result = CheckResult::fail("test", "error", Some("fix it"));
        assert!(!result.passed);
        assert!(result.suggestion.is_some());
    }

    #[test]
    fn test_missing_export_root_fails() {
        let results = check_export_root(Path::new("/nonexistent/cgx-export-root"));
        assert!(!results[0].passed);
    }

    #[test]
    fn test_existing_export_root_passes() {
        let temp = TempDir::new().unwrap();
        let results = check_export_root(temp.path());
        assert!(results[0].passed);
        assert!(!temp.path().join(".cgx-doctor-probe").exists());
    }

    #[test]
    fn test_storage_checks() {
        let temp = TempDir::new().unwrap();
        assert!(check_storage(temp.path())[0].is_warning());

        fs::create_dir(temp.path().join("courses")).unwrap();
        fs::write(temp.path().join("users.toml"), "users = [").unwrap();
        let results = check_storage(temp.path());
        assert!(results[0].passed);
        assert!(!results[1].passed);
    }
}
