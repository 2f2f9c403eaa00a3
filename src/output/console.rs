//! Console summaries

use crate::extract::ExtractedRecord;
use crate::orchestrator::RunStatistics;

/// Longest title or summary shown per record
const PREVIEW_CHARS: usize = 60;

/// Prints each extracted record to stdout
///
/// Titles and summaries are cut to a short preview; absent fields show as
/// `N/A`.
pub fn print_records(records: &[ExtractedRecord]) {
    println!("=== Results ===");

    for (i, record) in records.iter().enumerate() {
        println!();
        println!("Article {}:", i + 1);
        println!("  Title: {}", truncate_chars(&record.title, PREVIEW_CHARS));
        println!("  URL: {}", record.url);
        println!("  Author: {}", record.author.as_deref().unwrap_or("N/A"));
        println!(
            "  Published: {}",
            record.published_date.as_deref().unwrap_or("N/A")
        );
        println!(
            "  Summary: {}",
            truncate_chars(record.summary.as_deref().unwrap_or("N/A"), PREVIEW_CHARS)
        );
    }
    println!();
}

/// Prints run statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Overview:");
    println!("  Total URLs: {}", stats.total_items);
    println!("  Succeeded: {}", stats.successful_items);
    println!("  Failed: {}", stats.failed_items);
    if stats.abandoned_items > 0 {
        println!("  Abandoned: {}", stats.abandoned_items);
    }
    println!();

    println!("Timing:");
    println!("  Total time: {:.2}s", stats.total_time);
    println!("  Throughput: {:.2} items/sec", stats.items_per_second);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} URLs)",
        stats.success_rate(),
        stats.successful_items,
        stats.total_items
    );
    println!("Status: {}", stats.status);
}

/// Cuts `text` to at most `max` characters, appending `...` when shortened
///
/// Counts characters rather than bytes, so multi-byte text is never split.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
