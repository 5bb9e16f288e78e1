use super::commands::OutputFormat;
use super::utils::{emit, OK};
use docverify::config::ClientConfig;
use docverify::{DocverifyError, DocverifyResult, RecentActivityEntry, RecordCache};

pub fn handle_recent(config: &ClientConfig, clear: bool, format: &OutputFormat) -> DocverifyResult<()> {
    let cache = RecordCache::open(config.cache_path(), config.cache.capacity)
        .map_err(|e| DocverifyError::Storage(format!("{} (is another docverify process running?)", e)))?;

    if clear {
        cache.clear()?;
        println!("{} Recent activity cleared", OK);
        return Ok(());
    }

    let entries = cache.list()?;
    emit(format, &entries, print_entries)
}

fn print_entries(entries: &Vec<RecentActivityEntry>) {
    if entries.is_empty() {
        println!("\x1b[38;5;245mNo recent uploads\x1b[0m");
        return;
    }

    println!("\x1b[38;5;46mRecent uploads\x1b[0m");
    println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(50));
    for entry in entries {
        println!(
            "{}  {}  \x1b[38;5;51m{}\x1b[0m",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.fingerprint.short(),
            entry.label
        );
    }
}
