//! # krishi-llm: Text Generation for Krishi Advisor
//!
//! Sends prompts built by `krishi-core` to an external chat-completions
//! provider and returns the generated text.
//!
//! ## Where Generation Is Used
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  /api/insights ──────────► insights_prompt ─────────┐                  │
//! │  /api/operational-details ► operational_prompt ─────┼──► TextGenerator │
//! │  /api/natural-farming ───► natural_farming_prompt ──┘        │         │
//! │                                                              ▼         │
//! │                                                     ChatClient         │
//! │                                                     (reqwest)          │
//! │                                                                         │
//! │  Any LlmError ──► caller falls back (template or available: false)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`client`] - `TextGenerator` trait and `ChatClient`
//! - [`config`] - Provider configuration
//! - [`error`] - Error types

pub mod client;
pub mod config;
pub mod error;

pub use client::{ChatClient, TextGenerator};
pub use config::LlmConfig;
pub use error::{LlmError, LlmResult};
