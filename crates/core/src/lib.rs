//! Core library for forumfix
//!
//! This crate implements the **Functional Core** of the forumfix application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The forumfix project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`forumfix_core`** (this crate): Pure transformation functions with zero I/O
//! - **`forumfix`**: HTTP access to the forum, traversal and reporting (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no logging, no external state mutations
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! Anything worth logging (an attachment without its upload, for instance) is
//! returned to the caller as a [`repair::Diagnostic`] instead.
//!
//! # Module Organization
//!
//! - [`config`]: Parsing and validation of the TOML run configuration
//! - [`forum`]: Forum API response models and category tree flattening
//! - [`pagination`]: The page cursor used to walk paginated listings
//! - [`repair`]: Pattern rules and the reparation pipeline
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use forumfix_core::repair::{Pipeline, RuleSet};
//!
//! let pipeline = Pipeline::new(RuleSet::all());
//! let repair = pipeline.apply("<br/><br/>Hello</p></p>")?;
//!
//! assert!(repair.changed());
//! assert_eq!(repair.text, "<br/>Hello</p>");
//! ```

pub mod config;
pub mod forum;
pub mod pagination;
pub mod repair;
