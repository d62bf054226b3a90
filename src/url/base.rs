use crate::HarvestError;
use url::Url;

/// Scheme, host and explicit port of the seed URL
///
/// Computed once at the start of a crawl and passed by reference to everything
/// that resolves links. It carries no path, so `/node/1` found on page 7 of a
/// listing still resolves to `<origin>/node/1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Derives the base from any absolute HTTP(S) URL on the site
    ///
    /// # Examples
    ///
    /// ```
    /// use md_harvest::url::BaseUrl;
    /// use url::Url;
    ///
    /// let seed = Url::parse("http://example.com/blog?page=2").unwrap();
    /// let base = BaseUrl::from_url(&seed).unwrap();
    /// assert_eq!(base.as_str(), "http://example.com/");
    /// ```
    pub fn from_url(url: &Url) -> Result<Self, HarvestError> {
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(HarvestError::Config(crate::ConfigError::InvalidUrl(format!(
                "URL has no origin: {}",
                url
            ))));
        }

        let base = Url::parse(&origin.ascii_serialization())?;
        Ok(Self(base))
    }

    /// Returns the underlying URL (always ends with `/`)
    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Parses and validates a seed URL supplied by the user
///
/// Only `http` and `https` seeds are accepted.
pub fn parse_seed(seed: &str) -> Result<Url, HarvestError> {
    let url = Url::parse(seed.trim())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(HarvestError::Config(crate::ConfigError::InvalidUrl(format!(
            "Only HTTP and HTTPS seed URLs are supported, got: {}",
            url.scheme()
        ))));
    }

    if url.host_str().is_none() {
        return Err(HarvestError::Config(crate::ConfigError::InvalidUrl(format!(
            "Seed URL has no host: {}",
            seed
        ))));
    }

    Ok(url)
}
