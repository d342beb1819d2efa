//! Tilawa HTTP clients
//!
//! reqwest-based implementations of the collaborator traits in `tilawa-core`.
//!
//! # Features
//!
//! - **Verse text**: [`QuranCloudClient`] fetches Arabic text and a translation from alquran.cloud
//! - **Range parsing**: [`OpenAiRangeParser`] turns free-form requests into ranges with a chat model
//! - **Server API**: [`TilawaClient`] talks to a running Tilawa server and implements both traits
//!
//! # Example
//!
//! ```ignore
//! use tilawa_client::{QuranCloudClient, QuranCloudConfig};
//! use tilawa_core::{NormalizingProvider, Position, VerseTextProvider};
//!
//! let provider = NormalizingProvider::new(QuranCloudClient::new(QuranCloudConfig::default())?);
//! let verse = provider.fetch_verse(Position::new(2, 1)?).await?;
//! println!("{} / {}", verse.arabic_text, verse.english_text);
//! ```

mod client;
mod error;
mod http;
mod openai;
mod quran_cloud;
mod types;

pub use client::TilawaClient;
pub use error::{ClientError, Result};
pub use openai::OpenAiRangeParser;
pub use quran_cloud::QuranCloudClient;
pub use types::{
    AudioUrlResponse, ClientConfig, ErrorResponse, HealthResponse, OpenAiConfig,
    ParseRangeRequest, QuranCloudConfig, RangeFields, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
    DEFAULT_QURAN_API_URL, DEFAULT_TRANSLATION, SESSION_HEADER,
};
