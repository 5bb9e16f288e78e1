use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use docverify::DocumentRecord;
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "docverify")]
#[command(version = BUILD_VERSION)]
#[command(about = "Register and verify document fingerprints against an on-chain registry")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "\x1b[38;5;245mSigning key:\x1b[0m set DOCVERIFY_WALLET_KEY to register documents")]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'd', long, global = true, value_name = "DIR", env = "DOCVERIFY_DATA_DIR", help = "Data directory path")]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Fingerprint a file")]
    Hash {
        #[arg(help = "File to fingerprint")]
        file: PathBuf,
    },

    #[command(about = "Normalize fingerprint strings to canonical form")]
    #[command(long_about = "Normalize fingerprint strings to canonical form.\n\nAccepts 0x-prefixed or bare 64-character hex, and decimal or scientific-notation integers.")]
    Normalize {
        #[arg(required = true, help = "Raw fingerprint strings")]
        inputs: Vec<String>,
    },

    #[command(about = "Register a document in the registry")]
    #[command(long_about = "Fingerprint a document and register it with identity attributes.\n\nRequires DOCVERIFY_WALLET_KEY. A fingerprint can only be registered once.")]
    Add {
        #[arg(short, long, help = "Document to register")]
        file: PathBuf,
        #[command(flatten)]
        identity: IdentityArgs,
        #[arg(long, help = "Label shown in recent activity (defaults to the file name)")]
        label: Option<String>,
    },

    #[command(about = "Verify a single document or fingerprint")]
    #[command(group(ArgGroup::new("input").required(true).args(["raw", "file", "link"])))]
    Verify {
        #[arg(help = "Fingerprint in any accepted encoding")]
        raw: Option<String>,
        #[arg(short, long, help = "Document to fingerprint and verify")]
        file: Option<PathBuf>,
        #[arg(long, help = "Verification link containing the fingerprint")]
        link: Option<String>,
    },

    #[command(about = "Verify many fingerprints at once")]
    #[command(group(ArgGroup::new("source").required(true).args(["manual", "sheet"])))]
    Batch {
        #[arg(long, value_name = "TEXT", help = "Fingerprints separated by whitespace or commas")]
        manual: Option<String>,
        #[arg(long, value_name = "FILE", help = "Spreadsheet (.xlsx, .xls, .ods, .csv): header row, label column, fingerprint column")]
        sheet: Option<PathBuf>,
        #[arg(long, help = "Parallel registry lookups (1-8)")]
        concurrency: Option<usize>,
    },

    #[command(about = "Show or clear recently registered documents")]
    Recent {
        #[arg(long, help = "Forget all recent activity")]
        clear: bool,
    },

    #[command(about = "Build a verification link for a fingerprint")]
    Link {
        #[arg(help = "Fingerprint in any accepted encoding")]
        raw: String,
        #[arg(long, help = "Base URL (overrides links.base_url)")]
        base: Option<String>,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show effective configuration")]
    Show,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite existing configuration")]
        force: bool,
    },
    #[command(about = "Print the configuration file path")]
    Path,
    #[command(about = "Validate configuration")]
    Validate,
}

#[derive(Args, Clone, Default)]
pub struct IdentityArgs {
    #[arg(long, default_value = "", help = "Full name")]
    pub name: String,
    #[arg(long, default_value = "", value_name = "YYYY-MM-DD", help = "Date of birth")]
    pub dob: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "", help = "10-digit mobile number")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub aadhaar: String,
    #[arg(long, default_value = "")]
    pub pan: String,
    #[arg(long, default_value = "")]
    pub passport: String,
    #[arg(long, default_value = "")]
    pub driving_license: String,
    #[arg(long, default_value = "")]
    pub voter_id: String,
}

impl From<IdentityArgs> for DocumentRecord {
    fn from(args: IdentityArgs) -> Self {
        DocumentRecord {
            full_name: args.name,
            dob: args.dob,
            gender: args.gender,
            address: args.address,
            phone: args.phone,
            email: args.email,
            aadhaar: args.aadhaar,
            pan: args.pan,
            passport: args.passport,
            driving_license: args.driving_license,
            voter_id: args.voter_id,
        }
    }
}
