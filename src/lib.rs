//! # Content components for a rich text editor
//!
//! This crate turns a set of declarative content components, as a CMS
//! describes them, into the node and mark specs of a prosemirror style
//! editor. Every component is stored in the document as an element that
//! carries its name in `data-component` and its props as JSON in
//! `data-props`, so that it survives a trip through HTML.
//!
//! The entry point is [`build`].
pub mod adapter;
pub mod component;
pub mod config;
pub mod content;
pub mod dom;
pub mod fields;
pub mod model;
pub mod spec;
pub mod util;
pub mod view;

pub use adapter::build;
pub use component::{ComponentDescriptor, ComponentSet};
pub use spec::EditorSpecs;
