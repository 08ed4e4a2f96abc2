//! User command
//!
//! Manage the accounts commits are attributed to.

use anyhow::Result;
use clap::Subcommand;

use super::Settings;
use cgx_core::content::UserAccount;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List accounts
    List,

    /// Add or update an account
    Add {
        username: String,
        email: String,

        /// Allow the user to push every course
        #[arg(long)]
        staff: bool,
    },
}

/// Execute the user command
pub fn execute(cmd: UserCommand, settings: &Settings) -> Result<()> {
    use colored::Colorize;

    let store = settings.open_store()?;
    match cmd {
        UserCommand::List => {
            let users = store.load_accounts()?;
            if users.is_empty() {
                println!("No users stored in {}", store.base_dir().display());
            }
            for user in users {
                let staff = if user.is_staff { " (staff)" } else { "" };
                println!("{}  {}{}", user.username.cyan(), user.email, staff.yellow());
            }
        }
        UserCommand::Add {
            username,
            email,
            staff,
        } => {
            let mut account = UserAccount::new(&username, email);
            account.is_staff = staff;
            store.save_account(account)?;
            println!("{} Saved user {}", "✓".green(), username);
        }
    }
    Ok(())
}
