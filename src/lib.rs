#![doc = "copyright-pages: paginate a source tree into print-ready documents."]

//! The pipeline is scan → paginate → assemble → render:
//! - [`scan`] builds the sorted file list, applying the [`filter`] exclusion policy
//! - [`paginator`] answers page-count, page-range and content-section queries
//! - [`assemble`] turns those answers into rendering plans and maps global line windows back to files
//! - [`code_to_pdf`] renders a plan into a PDF through the [`render::DocumentSink`] seam
//! - [`generate`] ties it together for the CLI in [`cli`]

pub mod assemble;
pub mod cli;
pub mod code_to_pdf;
pub mod config;
pub mod filter;
pub mod generate;
pub mod load_config;
pub mod model;
pub mod paginator;
pub mod render;
pub mod scan;

pub use cli::{run, Cli, Commands};
