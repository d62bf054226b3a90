//! Configuration module for md-harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file.
//!
//! # Example
//!
//! ```no_run
//! use md_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Following at most {} listing pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    default_save_path, CollisionPolicy, Config, CrawlerConfig, ImageConfig, OutputConfig,
    SelectorConfig,
};

pub use parser::{load_config, parse_config};
pub use validation::{parse_selector, validate};
