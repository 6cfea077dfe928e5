use clap::Parser;
use course_mirror::Mirror;
use std::error::Error;

mod args;
use args::Args;

/// Course mirrored when neither a config file nor `--url` is given
const DEFAULT_START_URL: &str = "https://learn.example.com/";

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut mirror = Mirror::new(DEFAULT_START_URL);
    if let Some(path) = &args.config {
        mirror = match mirror.with_config_file(path) {
            Ok(mirror) => mirror,
            Err(e) => {
                ::log::error!("{}", e);
                std::process::exit(1);
            }
        };
    }

    // Command-line flags win over the configuration file
    if let Some(url) = &args.url {
        mirror = mirror.with_start_url(url);
    }
    if let Some(path) = args.cookies {
        mirror = mirror.with_cookies_path(path);
    }
    if let Some(dir) = args.output {
        mirror = mirror.with_output_dir(dir);
    }
    if let Some(url) = &args.webdriver_url {
        mirror = mirror.with_webdriver_url(url);
    }
    if let Some(seconds) = args.wait_timeout {
        mirror = mirror.with_wait_timeout(seconds);
    }
    if let Some(retries) = args.download_retries {
        mirror = mirror.with_download_retries(retries);
    }

    ::log::info!("Mirroring {}", mirror.config().start_url);
    println!("Note: mirroring requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let start_time = std::time::Instant::now();
    match mirror.run().await {
        Ok(stats) => {
            ::log::info!(
                "Mirror complete - {} pages in {} sections of {} titles, {} images, {:.2} seconds",
                stats.pages,
                stats.sections,
                stats.titles,
                stats.images,
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            ::log::error!("Mirror failed: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                ::log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
