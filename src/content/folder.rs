//! Folder names derived from node titles
//!
//! A title is lowercased, Cyrillic letters are transliterated to Latin, a small
//! escape table maps or drops punctuation, and anything still outside
//! `[a-z0-9_-]` is dropped. The result depends on the title alone.

use sha2::{Digest, Sha256};
use url::Url;

/// Cyrillic to Latin transliteration (lowercase input)
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shh",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

/// Punctuation that is mapped rather than dropped
fn escape(c: char) -> Option<&'static str> {
    match c {
        '+' => Some("plus"),
        '/' => Some("-"),
        c if c.is_whitespace() => Some("-"),
        _ => None,
    }
}

/// Derives the folder name for a node title
///
/// # Examples
///
/// ```
/// use md_harvest::content::folder_name;
///
/// assert_eq!(folder_name("Hello, World!"), "hello-world");
/// assert_eq!(folder_name("C++ / Rust"), "cplusplus---rust");
/// assert_eq!(folder_name("Привет мир"), "privet-mir");
/// ```
pub fn folder_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len());

    for c in title.to_lowercase().chars() {
        if let Some(latin) = transliterate(c) {
            name.push_str(latin);
        } else if let Some(mapped) = escape(c) {
            name.push_str(mapped);
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
        }
    }

    name
}

/// First 8 hex characters of the SHA-256 of a node URL
pub fn url_tag(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// Folder name used when a title yields nothing usable
pub fn fallback_folder_name(url: &Url) -> String {
    format!("node-{}", url_tag(url))
}

/// Folder name for a node whose preferred name is already taken
pub fn disambiguate(folder: &str, url: &Url) -> String {
    format!("{}-{}", folder, url_tag(url))
}
