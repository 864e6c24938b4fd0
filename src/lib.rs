//! carbontrace — interactive dashboard over a static carbon-emissions table.
//!
//! The library is organized around one synchronous reactive cycle:
//! a filter interaction (dropdown change, chart click, reset) produces a new
//! [`filter::FilterState`], and [`view::recompute`] derives every displayed
//! artifact (summary metrics, chart aggregates, table rows) from scratch.
//! The [`web`] module serves the embedded single-page dashboard; [`cli`]
//! exposes the same aggregates on the command line.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod view;
pub mod web;
