//! Prompt deck engine for design warmup exercises.
//!
//! This crate provides:
//! - A catalog of prompts, tolerant of older and newer document shapes
//! - Filters over time, tags and mode
//! - A shuffled, non-repeating deck with back-navigation
//! - Persistence of filters, deck and history through a key-value store
//! - An exercise countdown timer
//!
//! # Quick Start
//!
//! ```ignore
//! use warmup_core::{Catalog, DeckEngine, FileStore, FilterAxis};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Catalog::load_json("prompts.json").await?;
//!     let store = FileStore::open("state")?;
//!     let mut engine = DeckEngine::open(catalog, store);
//!
//!     engine.toggle_filter(FilterAxis::Tag, "typography")?;
//!     engine.advance()?;
//!     if let Some(prompt) = engine.current_prompt() {
//!         println!("{}: {}", prompt.title, prompt.body);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod deck;
pub mod engine;
pub mod filter;
pub mod history;
pub mod persist;
pub mod prefs;
pub mod store;
pub mod testing;
pub mod timer;

// Primary public API
pub use catalog::{Catalog, CatalogError, PromptEntry, TimeMinutes};
pub use config::EngineConfig;
pub use deck::{Deck, DeckState};
pub use engine::{Advance, DeckEngine, EngineError};
pub use filter::{FilterAxis, FilterError, FilterSet, TimeBucket};
pub use history::History;
pub use prefs::{Favorites, Preferences};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use testing::{prompt, TestHarness};
pub use timer::{Countdown, TimerState};
