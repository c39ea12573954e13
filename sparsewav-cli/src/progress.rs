//! Terminal progress display

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

/// Magnifying glass, for reading and scanning
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package, for compression
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Speaker, for restoring audio
pub static SPEAKER: Emoji<'_, '_> = Emoji("🔊 ", "");
/// Scissors, for splitting into files
pub static SCISSORS: Emoji<'_, '_> = Emoji("✂️  ", "");
/// Sparkles, for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print a step indicator: `[1/3] 🔊 Message...`
pub fn print_step(current: usize, total: usize, emoji: &Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Progress bar style for determinate progress
///
/// Format: `name [########--------] 50/100 (50%)`
fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("##-"))
}

/// A bar over `total` steps. Hidden when `quiet` is set.
#[must_use]
pub fn simple_bar(total: u64, msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}

/// A bar over 0..=100 fed by a library progress callback
#[must_use]
pub fn percent_bar(msg: &str, quiet: bool) -> ProgressBar {
    simple_bar(100, msg, quiet)
}
