//! `figment` integration.
//!
//! This module is feature-gated behind the `figment` feature.

use serde::de::DeserializeOwned;
use std::path::Path;

/// A [`figment::providers::Format`] implementation for argument strings backed by
/// `serde-ptargs`.
///
/// This enables Figment usage like:
///
/// ```rust
/// # #[cfg(feature = "figment")]
/// # {
/// use figment::{Figment, providers::Format};
/// use serde::Deserialize;
/// use serde_ptargs::figment::PtArgs;
///
/// #[derive(Deserialize)]
/// struct Config { cert: String, port: u16 }
///
/// // Every decoded value is a string, so numeric fields need lossy extraction.
/// let cfg: Config = Figment::from(PtArgs::string("cert=abc;port=443"))
///     .extract_lossy()
///     .unwrap();
/// assert_eq!(cfg.port, 443);
/// # }
/// ```
///
/// Figment decodes every source into its own untyped value tree first, so a key's shape
/// there follows how often it occurs: one value becomes a string, several become an
/// array. A `Vec<T>` field therefore needs the key at least twice, or a
/// `deserialize_with` that accepts a lone value. [`crate::from_str`] has no such
/// restriction because it deserializes straight into the target type.
pub struct PtArgs;

impl ::figment::providers::Format for PtArgs {
    type Error = crate::Error;

    const NAME: &'static str = "PT args";

    fn from_str<'de, T: DeserializeOwned>(string: &'de str) -> Result<T, Self::Error> {
        crate::from_str(string)
    }

    fn from_path<T: DeserializeOwned>(path: &Path) -> Result<T, Self::Error> {
        let bytes = std::fs::read(path)?;
        let text = crate::parse::to_str(&bytes)?;
        // A final unescaped newline is file formatting, not part of the argument string.
        crate::from_str(crate::scan::strip_line_ending(text))
    }
}
