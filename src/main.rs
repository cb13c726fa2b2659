use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use podgrab::{
    process_source, MediaKind, NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient,
    SharedProgressReporter, SourceKind,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Download podcast episodes with cover art and thumbnails
#[derive(Parser, Debug)]
#[command(name = "podgrab")]
#[command(about = "Download podcast episodes from an RSS feed or a single episode page")]
#[command(version)]
struct Args {
    /// Feed URL or episode page URL
    url: String,

    /// Kind of source the URL points at
    #[arg(short, long, value_enum, default_value_t = SourceKind::Feed)]
    source: SourceKind,

    /// Output directory for downloaded episodes
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output.
///
/// The pipeline is strictly sequential, so a single spinner plus a single
/// asset bar is enough; no per-slot bar bookkeeping.
struct IndicatifReporter {
    multi: MultiProgress,
    main_bar: ProgressBar,
    asset_bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            main_bar,
            asset_bar: Mutex::new(None),
        }
    }

    fn start_asset_bar(&self, kind: MediaKind, length: Option<u64>) {
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {kind}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        let bar = self.multi.add(ProgressBar::new(length.unwrap_or(0)));
        bar.set_style(style);

        let mut slot = self.asset_bar.lock().unwrap();
        if let Some(old) = slot.replace(bar) {
            old.finish_and_clear();
        }
    }

    fn finish_asset_bar(&self) {
        if let Some(bar) = self.asset_bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingSource { url } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Fetching source: {}", url.cyan()));
            }

            ProgressEvent::FeedParsed { episode_count } => {
                self.main_bar.set_message(format!(
                    "{HEADPHONES}{} episodes found",
                    episode_count.to_string().cyan()
                ));
            }

            ProgressEvent::EpisodeStarting {
                episode_index,
                total_episodes,
                episode_title,
            } => {
                self.main_bar.set_message(format!(
                    "[{}/{}] {}",
                    (episode_index + 1).to_string().cyan(),
                    total_episodes.to_string().cyan(),
                    truncate_title(&episode_title, 50)
                ));
            }

            ProgressEvent::AssetStarting {
                kind,
                content_length,
                ..
            } => {
                self.start_asset_bar(kind, content_length);
            }

            ProgressEvent::AssetProgress {
                bytes_downloaded,
                total_bytes,
                ..
            } => {
                if let Some(bar) = self.asset_bar.lock().unwrap().as_ref() {
                    if let Some(total) = total_bytes {
                        bar.set_length(total);
                    }
                    bar.set_position(bytes_downloaded);
                }
            }

            ProgressEvent::AssetCompleted { .. } => {
                self.finish_asset_bar();
            }

            ProgressEvent::AssetSkipped { kind, .. } => {
                self.main_bar
                    .println(format!("  {} no {kind} for this episode", "skip:".yellow()));
            }

            ProgressEvent::DirCreateFailed { path, error } => {
                self.main_bar.println(format!(
                    "  {} could not create {}: {}",
                    "warn:".yellow(),
                    path.display(),
                    error
                ));
            }

            ProgressEvent::ThumbnailWritten { .. } => {}

            ProgressEvent::ThumbnailFailed { path, error } => {
                self.main_bar.println(format!(
                    "  {} thumbnail for {} failed: {}",
                    "warn:".yellow(),
                    path.display(),
                    error
                ));
            }

            ProgressEvent::EpisodeCompleted { episode_title } => {
                self.finish_asset_bar();
                self.main_bar.println(format!(
                    "{SUCCESS}{}",
                    truncate_title(&episode_title, 60).green()
                ));
            }

            ProgressEvent::EpisodeFailed {
                episode_title,
                error,
            } => {
                self.finish_asset_bar();
                self.main_bar.println(format!(
                    "{FAILURE}{} - {}",
                    truncate_title(&episode_title, 40).red(),
                    error.red()
                ));
            }

            ProgressEvent::RunCompleted { downloaded, failed } => {
                self.finish_asset_bar();
                self.main_bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} downloaded, {} failed",
                    "Download complete:".bold().green(),
                    downloaded.to_string().green().bold(),
                    if failed > 0 {
                        failed.to_string().red().bold()
                    } else {
                        failed.to_string().green()
                    }
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "\n{}{} {}\n",
        MICROPHONE,
        "podgrab".bold().magenta(),
        "- Podcast Downloader".dimmed()
    );

    let client = ReqwestClient::new();

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let result = process_source(args.source, &client, &args.url, &args.output, reporter)
        .await
        .context("Failed to process source")?;

    if !args.quiet && !result.failed_episodes.is_empty() {
        println!("\n{}", "Failed episodes:".red().bold());
        for (title, error) in &result.failed_episodes {
            println!(
                "  {}{} - {}",
                CROSS,
                title.yellow(),
                error.to_string().dimmed()
            );
        }
    }

    if !args.quiet {
        println!(
            "\n{FOLDER}Output: {}\n",
            args.output.display().to_string().cyan()
        );
    }

    if result.failed > 0 && result.downloaded == 0 {
        std::process::exit(1);
    }

    Ok(())
}
