//! Interactive patch-graph editor component.
//!
//! Lets the user build an audio-synthesis patch on an HTML canvas: click
//! empty space to place a widget (oscillator, buzz, ...), drag node to node
//! to wire a directional link, and edit with the keyboard (delete, link
//! direction, self-loop toggle). A force simulation keeps the layout settled
//! while editing.
//!
//! The editing core — [`model`], [`scene`], [`simulation`], [`input`] and
//! the [`state::EditorState`] session tying them together — is pure Rust
//! with no DOM access: the scene reconciler emits explicit instruction lists
//! for a rendering backend, so the whole interaction layer is testable off
//! the browser. [`render`] and [`component`] are the canvas backend and the
//! Leptos wrapper on top of it.
//!
//! # Example
//!
//! ```ignore
//! use patch_graph::{EditorConfig, PatchEditorCanvas};
//!
//! view! { <PatchEditorCanvas config=EditorConfig::default() /> }
//! ```

mod component;
pub mod input;
pub mod model;
pub mod registry;
mod render;
pub mod scale;
pub mod scene;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod types;

pub use component::PatchEditorCanvas;
pub use state::EditorState;
pub use theme::Theme;
pub use types::{EditorConfig, NodeId, NodeKind};
