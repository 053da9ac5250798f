use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reporthist")]
#[command(about = "Browse the execution history of a scheduled report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Id of the report schedule whose history to show
    pub report_id: i64,

    /// Server root, e.g. http://localhost:8088
    #[arg(long, env = "REPORT_HISTORY_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, env = "REPORT_HISTORY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Rows per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Config file (defaults to the XDG config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
