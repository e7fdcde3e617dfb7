//! Decoder for pluggable transport argument strings.
//!
//! Proxy parameters are often passed as one flat string of `key=value` pairs separated by
//! semicolons, with a backslash escaping `=`, `;` and `\` inside keys and values:
//!
//! ```text
//! cert=ssH+9rP8dG2NLDN2XuFw63hIO/9MNNinLmxQDpVa+7kTOa9/m+tGWT1SmSYpQ9uTBGa6Hw;iat-mode=0
//! ```
//!
//! [`parse`] turns such a string into an [`Args`] multi-map. [`from_str`] goes one step
//! further and deserializes the decoded pairs into any Serde type.
//!
//! ```rust
//! let args = serde_ptargs::parse(r"secret=a\;b;x=1;x=2").unwrap();
//! assert_eq!(args.get("secret"), Some("a;b"));
//! assert_eq!(args.get_all("x").unwrap(), ["1", "2"]);
//!
//! let err = serde_ptargs::parse("a=1;").unwrap_err();
//! assert_eq!(err.kind(), serde_ptargs::ErrorKind::MissingEquals);
//! ```
#![forbid(unsafe_code)]

pub mod args;
pub mod budget;
#[cfg(feature = "deserialize")]
mod de;
mod error;
#[cfg(feature = "figment")]
pub mod figment;
mod location;
mod macros;
#[cfg(feature = "miette")]
pub mod miette;
pub mod options;
mod parse;
pub mod scan;
mod snippet;

pub use args::Args;
pub use budget::{Budget, BudgetBreach, BudgetReport, check_budget};
#[cfg(feature = "deserialize")]
pub use de::{from_args, from_slice, from_slice_with_options, from_str, from_str_with_options};
pub use error::{Error, ErrorKind};
pub use location::{Location, Span};
pub use options::Options;
pub use parse::{Pair, Pairs, parse, parse_slice, parse_slice_with_options, parse_with_options};
