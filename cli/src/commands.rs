//! Command grammar shared by one-shot invocations and the interactive shell

use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug, Clone)]
pub enum Action {
    /// Sign in and store the session token
    Login {
        username: String,
        #[arg(long, env = "TRACKING_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session token
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        patronymic: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long = "confirm")]
        password_confirmation: String,
    },
    /// Show a page, e.g. `open /tasks`
    Open { route: String },
    /// Print the side menu
    Menu,
    /// Tasks page actions
    #[command(subcommand)]
    Task(TaskCmd),
    /// Company management actions
    #[command(subcommand)]
    Company(CompanyCmd),
    /// User management actions
    #[command(subcommand)]
    User(UserCmd),
    /// Company resource (service) actions
    #[command(subcommand)]
    Resource(ResourceCmd),
    /// Monitoring check actions
    #[command(subcommand)]
    Check(CheckCmd),
    /// Update your own profile
    Account(ProfileArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCmd {
    Add(TaskArgs),
    Update {
        id: i64,
        #[command(flatten)]
        task: TaskArgs,
    },
    Complete { id: i64 },
    Delete { id: i64 },
    Reassign { id: i64, user: i64 },
}

#[derive(clap::Args, Debug, Clone)]
pub struct TaskArgs {
    #[arg(long)]
    pub resource: Option<i64>,
    #[arg(long)]
    pub assignee: Option<i64>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "Opened")]
    pub status: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CompanyCmd {
    Add { name: String },
    Rename { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCmd {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        patronymic: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "User")]
        role: String,
        #[arg(long)]
        company: Option<i64>,
    },
    Update {
        id: i64,
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        role: Option<String>,
    },
    Delete { id: i64 },
    /// Add a user to a company
    Join { user: i64, company: i64 },
    /// Remove a user from a company
    Leave { user: i64, company: i64 },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub patronymic: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourceCmd {
    Add(ResourceArgs),
    Update {
        id: i64,
        #[command(flatten)]
        resource: ResourceArgs,
    },
    Delete { id: i64 },
    /// Take a catalogue service into your company
    Adopt { id: i64 },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ResourceArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type")]
    pub kind: String,
    #[arg(long)]
    pub source: String,
    #[arg(long, default_value = "Active")]
    pub status: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CheckCmd {
    Add(CheckArgs),
    Update {
        id: i64,
        #[command(flatten)]
        check: CheckArgs,
    },
    Delete { id: i64 },
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long)]
    pub resource: i64,
    #[arg(long)]
    pub interval: String,
    /// Enable the check
    #[arg(long)]
    pub enabled: bool,
}

/// One line typed into the interactive shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Action {
        let words = shell_words::split(line).unwrap();
        ShellLine::try_parse_from(&words).unwrap().action
    }

    #[test]
    fn quoted_description_stays_one_argument() {
        let Action::Task(TaskCmd::Add(args)) =
            parse(r#"task add --resource 3 --assignee 7 --description "Check endpoint""#)
        else {
            panic!("task add expected");
        };
        assert_eq!(args.resource, Some(3));
        assert_eq!(args.assignee, Some(7));
        assert_eq!(args.description, "Check endpoint");
        assert_eq!(args.status, "Opened");
    }

    #[test]
    fn escaped_space_and_empty_quotes() {
        let Action::Company(CompanyCmd::Add { name }) = parse(r"company add Acme\ Labs") else {
            panic!("company add expected");
        };
        assert_eq!(name, "Acme Labs");

        let Action::Company(CompanyCmd::Add { name }) = parse("company add ''") else {
            panic!("company add expected");
        };
        assert_eq!(name, "");
    }

    #[test]
    fn unterminated_quote_is_a_split_error() {
        assert!(shell_words::split("open \"/tasks").is_err());
        assert!(shell_words::split("   ").unwrap().is_empty());
    }
}
