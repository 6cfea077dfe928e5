use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "course-mirror")]
#[command(about = "Mirrors an e-learning course into an offline folder tree")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Course page listing the titles (overrides the configuration)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Captured cookie file (JSON array of WebDriver cookies)
    #[arg(long)]
    pub cookies: Option<PathBuf>,

    /// Directory to write the mirror into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Seconds to wait for a view to render before giving up
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Extra attempts for a failed image download
    #[arg(long)]
    pub download_retries: Option<u32>,
}
