//! Chapter list and search against equran.id.
//!
//! Run with: cargo run --example quran --features async -- yasin

use miqat::network::{filter_chapters, EquranClient, QuranProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let query = std::env::args().nth(1).unwrap_or_default();
    let client = EquranClient::new()?;

    let chapters = client.list_chapters().await?;
    let matches = filter_chapters(&chapters, &query);
    println!("{} of {} chapters match {:?}", matches.len(), chapters.len(), query);
    for chapter in matches.iter().take(10) {
        println!(
            "  {:>3}. {:<16} {}  ({} ayat, {})",
            chapter.number, chapter.name_local, chapter.name_arabic, chapter.verse_count, chapter.revelation_place
        );
    }

    if let Some(first) = matches.first() {
        let detail = client.chapter_detail(first.number).await?;
        for verse in detail.verses.iter().take(3) {
            println!();
            println!("  [{}] {}", verse.verse_number, verse.arabic_text);
            println!("      {}", verse.translation);
        }
    }
    Ok(())
}
