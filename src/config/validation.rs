use crate::config::types::{Config, CrawlerConfig, ImageConfig, OutputConfig, SelectorConfig};
use crate::{ConfigError, ConfigResult};
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_image_config(&config.images)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_image_config(config: &ImageConfig) -> ConfigResult<()> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

fn validate_selector_config(config: &SelectorConfig) -> ConfigResult<()> {
    for selector in [
        &config.node_link,
        &config.next_page,
        &config.title,
        &config.content,
    ] {
        parse_selector(selector)?;
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.save_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "save_path cannot be empty".to_string(),
        ));
    }

    validate_file_name("summary_file", &config.summary_file)?;
    validate_file_name("index_file", &config.index_file)?;

    Ok(())
}

/// A bare file name: non-empty, no path separators, not `.` or `..`
fn validate_file_name(field: &str, name: &str) -> ConfigResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain file name, got '{}'",
            field, name
        )));
    }
    Ok(())
}

/// Parses a CSS selector, mapping failures into a config error
pub fn parse_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
