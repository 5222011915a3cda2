//! Vndialog - sprite sheet indexing and dialog screen compositing
//!
//! This library provides functionality to:
//! - Reverse-engineer the unlabeled expression grid of a character sheet
//! - Extract and number the cells that hold real artwork for selection
//! - Composite a game-style dialog screen with name tag and wrapped text

pub mod assets;
pub mod detect;
pub mod dialog;
pub mod error;
pub mod geometry;
pub mod indexer;
pub mod output;
pub mod raster;
pub mod text;
