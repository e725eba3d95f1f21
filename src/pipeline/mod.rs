//! Pipeline stages for idea-to-deck generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the image provider) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! idea ──▶ llm ──▶ parse ──▶ layout ──▶ pdf
//! (text)   (chat)  (JSON)    (blocks)   (printpdf)
//!                              images ────▶┘
//!                              (best-effort photos)
//! ```
//!
//! 1. [`llm`]    — one chat-completion call asking for the deck as JSON; the
//!    only stage that can fail the run on network grounds
//! 2. [`parse`]  — strict JSON parsing with the placeholder-deck fallback
//! 3. [`layout`] — pure content-to-styled-blocks rules, no geometry
//! 4. [`images`] — per-section stock-photo lookup; failures degrade to "no
//!    photo", never to an error
//! 5. [`pdf`]    — page geometry, wrapping, pagination, and the final save;
//!    runs in `spawn_blocking` because document building is synchronous

pub mod images;
pub mod layout;
pub mod llm;
pub mod parse;
pub mod pdf;
