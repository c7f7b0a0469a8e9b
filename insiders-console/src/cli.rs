//! Command-line surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use insiders_tabular::ExportFormat;

/// Insiders Club console: sign-in flows, the admin customer table and the
/// customer profile.
#[derive(Debug, Parser)]
#[command(name = "insiders", version, about)]
pub struct Cli {
    /// Backend base URL (endpoint paths are appended)
    #[arg(long, env = "INSIDERS_API_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Backend revision: legacy, fixed or dynamic
    #[arg(long, env = "INSIDERS_BACKEND_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Directory holding the session file
    #[arg(
        long,
        env = "INSIDERS_SESSION_DIR",
        default_value = "./.insiders",
        global = true
    )]
    pub session_dir: PathBuf,

    /// Log as JSON lines instead of plain text
    #[arg(long, env = "INSIDERS_LOG_JSON", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a customer account
    Signup(SignupArgs),
    /// Sign in as a customer
    Login(Credentials),
    /// Sign in as an admin
    AdminLogin(Credentials),
    /// Forget the stored session
    Logout,
    /// Email a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with the emailed token
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        new_password: String,
    },
    /// Show the signed-in customer's profile and tier
    Profile {
        /// Reload the record from the backend first
        #[arg(long)]
        refresh: bool,
    },
    /// List all customers (admin)
    List,
    /// Show one customer (admin)
    Show { id: String },
    /// Add a customer (admin)
    Add(EditArgs),
    /// Edit a customer (admin)
    Update {
        id: String,
        #[command(flatten)]
        edit: EditArgs,
    },
    /// Delete a customer (admin)
    Delete { id: String },
    /// Delete every customer (admin)
    DeleteAll {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Upload a CSV of customers (admin)
    Upload { file: PathBuf },
    /// Export the customer table (admin)
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// Output path, `customers.csv` / `customers.xlsx` by default
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub employee: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Field assignment, `column=value` (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,

    /// New password; left unchanged when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

/// `key=value`; the value may itself contain `=`
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected column=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column name in `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
