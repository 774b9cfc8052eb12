//! Quran chapters and verses from the equran.id API.

use std::future::Future;

use miqat_types::MiqatError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Public equran.id v2 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://equran.id/api/v2";

/// Number of chapters (surah) in the Quran.
pub const CHAPTER_COUNT: u16 = 114;

/// One chapter (surah) header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1..=114.
    pub number: u16,
    /// Latin transliteration (e.g. "Al-Fatihah").
    pub name_local: String,
    pub name_arabic: String,
    pub verse_count: u32,
    /// "Mekah" or "Madinah".
    pub revelation_place: String,
    pub translated_meaning: String,
    /// HTML description as served by the provider.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub verse_number: u32,
    pub arabic_text: String,
    pub transliteration: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDetail {
    pub chapter: Chapter,
    pub verses: Vec<Verse>,
}

// Wire format (Indonesian field names).

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[allow(dead_code)]
    code: u16,
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChapter {
    nomor: u16,
    nama: String,
    nama_latin: String,
    jumlah_ayat: u32,
    tempat_turun: String,
    arti: String,
    deskripsi: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerse {
    nomor_ayat: u32,
    teks_arab: String,
    teks_latin: String,
    teks_indonesia: String,
}

#[derive(Debug, Deserialize)]
struct RawChapterDetail {
    #[serde(flatten)]
    chapter: RawChapter,
    ayat: Vec<RawVerse>,
}

impl From<RawChapter> for Chapter {
    fn from(raw: RawChapter) -> Self {
        Self {
            number: raw.nomor,
            name_local: raw.nama_latin,
            name_arabic: raw.nama,
            verse_count: raw.jumlah_ayat,
            revelation_place: raw.tempat_turun,
            translated_meaning: raw.arti,
            description: raw.deskripsi,
        }
    }
}

impl From<RawVerse> for Verse {
    fn from(raw: RawVerse) -> Self {
        Self {
            verse_number: raw.nomor_ayat,
            arabic_text: raw.teks_arab,
            transliteration: raw.teks_latin,
            translation: raw.teks_indonesia,
        }
    }
}

/// Keeps chapters whose latin name contains `query` (case-insensitive) or
/// whose number contains it as text. An empty query keeps everything.
pub fn filter_chapters<'a>(chapters: &'a [Chapter], query: &str) -> Vec<&'a Chapter> {
    let needle = query.to_lowercase();
    chapters
        .iter()
        .filter(|c| c.name_local.to_lowercase().contains(&needle) || c.number.to_string().contains(query))
        .collect()
}

/// Source of Quran text.
pub trait QuranProvider: Send + Sync {
    /// All chapter headers, in order.
    fn list_chapters(&self) -> impl Future<Output = Result<Vec<Chapter>, MiqatError>> + Send;

    /// One chapter with its verses.
    fn chapter_detail(&self, number: u16) -> impl Future<Output = Result<ChapterDetail, MiqatError>> + Send;
}

/// HTTP client for equran.id.
///
/// # Example
/// ```rust,no_run
/// use miqat_network::{EquranClient, QuranProvider};
///
/// #[tokio::main]
/// async fn main() {
///     let client = EquranClient::new().unwrap();
///     let fatihah = client.chapter_detail(1).await.unwrap();
///     println!("{} ({} ayat)", fatihah.chapter.name_local, fatihah.verses.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EquranClient {
    http: reqwest::Client,
    base_url: String,
}

impl EquranClient {
    pub fn new() -> Result<Self, MiqatError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the client at another deployment (or a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, MiqatError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("miqat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MiqatError::network(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` and unwraps the envelope. `Ok(None)` on 404 or empty data.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, MiqatError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MiqatError::network(format!("Request to {} failed: {}", url, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(MiqatError::network(format!("{} returned {}", url, response.status())));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| MiqatError::network(format!("Failed to parse response from {}: {}", url, e)))?;
        if envelope.data.is_none() {
            debug!(message = %envelope.message, "empty payload");
        }
        Ok(envelope.data)
    }
}

impl QuranProvider for EquranClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_chapters(&self) -> Result<Vec<Chapter>, MiqatError> {
        let raw: Vec<RawChapter> = self
            .fetch("/surat")
            .await?
            .ok_or_else(|| MiqatError::network("Chapter list is empty"))?;
        debug!(count = raw.len(), "chapters fetched");
        Ok(raw.into_iter().map(Chapter::from).collect())
    }

    #[instrument(level = "debug", skip(self))]
    async fn chapter_detail(&self, number: u16) -> Result<ChapterDetail, MiqatError> {
        if !(1..=CHAPTER_COUNT).contains(&number) {
            return Err(MiqatError::ChapterNotFound(number));
        }
        let raw: RawChapterDetail = self
            .fetch(&format!("/surat/{}", number))
            .await?
            .ok_or(MiqatError::ChapterNotFound(number))?;
        Ok(ChapterDetail {
            chapter: raw.chapter.into(),
            verses: raw.ayat.into_iter().map(Verse::from).collect(),
        })
    }
}
