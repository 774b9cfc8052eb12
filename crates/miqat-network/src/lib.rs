//! Network module for remote data fetching.
//!
//! Provides the Quran text provider used by the reading screens. The
//! schedule and Qibla engines never touch the network.

pub mod quran;

pub use quran::{filter_chapters, Chapter, ChapterDetail, EquranClient, QuranProvider, Verse, DEFAULT_BASE_URL};
