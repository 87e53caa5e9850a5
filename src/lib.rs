//! # texier
//!
//! A compiler from Texy-style lightweight markup to sanitized HTML.
//!
//! The grammar is not fixed at compile time. Every syntax module contributes named
//! productions to two shared, mutually recursive nonterminals (block content and
//! inline content), and the registry resolves them lazily once per run.
//!
//! File Layout
//!
//! src/texier
//!   ├── parsing      Cursor, expression engine, grammar registry
//!   ├── ast          Element model, modifiers, the processed document
//!   ├── validation   Tag classification and the sanitization policy
//!   ├── formats      HTML rendering
//!   ├── modules      Syntax modules (phrase, html, heading, list, table, ...)
//!   ├── config       Layered configuration with embedded defaults
//!   └── processor    One document in, one element tree out
//!
//! Validation happens while the tree is built: a production whose transform rejects
//! its input fails like any other mismatch, so rendering never sanitizes again.

pub mod texier;
