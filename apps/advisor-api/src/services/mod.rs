//! Service layer.
//!
//! Each service combines a prompt from `krishi-core`, the memoization cache
//! and the text generator, and always produces a usable answer:
//!
//! ```text
//! cache hit ──────────────────────────────► cached value
//! cache miss ──► generator ──► ok ──► parse ──► cache set ──► value
//!                    │
//!                    └── absent / error ──► fallback (template or available: false)
//! ```

pub mod generation;
pub mod health;
pub mod insights;
pub mod natural_farming;
pub mod operational;
