//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "admin-console")]
#[command(about = "Admin console for accounts, roles, permissions and rules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL
    #[arg(long, global = true, env = "ADMIN_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ADMIN_API_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Directory holding the persisted session
    #[arg(long, global = true, env = "ADMIN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    pub log_json: bool,

    /// Also write daily-rolling log files here
    #[arg(long, global = true, env = "LOG_DIR")]
    pub log_dir: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and remove the persisted session
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// List the route table
    Routes,

    /// Run the route guard for a path
    Navigate { path: String },

    /// Show the menu visible to the signed-in user
    Menu,

    /// Manage accounts
    #[command(subcommand)]
    Accounts(AccountCommand),

    /// Manage roles
    #[command(subcommand)]
    Roles(RoleCommand),

    /// Manage permissions
    #[command(subcommand)]
    Permissions(PermissionCommand),

    /// Manage permission rules
    #[command(subcommand)]
    Rules(RuleCommand),
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    #[arg(long)]
    pub search: Option<String>,
}

/// Create/update/delete, shared by every resource
#[derive(Debug, Subcommand)]
pub enum CrudCommand {
    /// Create from a JSON payload
    Create { json: String },

    /// Update from a JSON payload carrying the id
    Update { json: String },

    /// Delete by id
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// List one page
    List(ListArgs),

    /// Replace an account's roles
    AssignRoles {
        id: String,
        #[arg(required = true)]
        role_ids: Vec<String>,
    },

    /// Show the role IDs of an account
    UserRoles { id: String },

    #[command(flatten)]
    Crud(CrudCommand),
}

#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    List(ListArgs),

    /// Every role as id/name pairs
    All,

    /// Show the permission IDs bound to a role
    Permissions { id: String },

    /// Replace a role's permissions
    AssignPermissions {
        id: String,
        permission_ids: Vec<String>,
    },

    #[command(flatten)]
    Crud(CrudCommand),
}

#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    List(ListArgs),

    #[command(flatten)]
    Crud(CrudCommand),
}

#[derive(Debug, Subcommand)]
pub enum RuleCommand {
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only rules of this role
        #[arg(long)]
        role_id: Option<String>,
    },

    #[command(flatten)]
    Crud(CrudCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rule_list() {
        let cli = Cli::try_parse_from([
            "admin-console",
            "rules",
            "list",
            "--page-size",
            "5",
            "--role-id",
            "r-op",
        ])
        .unwrap();
        match cli.command {
            Command::Rules(RuleCommand::List { list, role_id }) => {
                assert_eq!(list.page_size, Some(5));
                assert_eq!(role_id.as_deref(), Some("r-op"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_account_delete() {
        let cli = Cli::try_parse_from(["admin-console", "accounts", "delete", "u-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Accounts(AccountCommand::Crud(CrudCommand::Delete { ref id })) if id == "u-1"
        ));
    }
}
