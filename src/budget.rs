//! Resource budget for decoding argument strings.
//!
//! Argument strings usually arrive from the network (a SOCKS handshake, an environment
//! variable set by a controller), so a decoder facing untrusted input needs upper bounds on
//! how much it is willing to allocate.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::location::Span;
use crate::parse::{Pair, Pairs};

/// Budgets for decoding one argument string.
///
/// The defaults are permissive for real pluggable transport configurations (a handful of
/// keys, certificates of a few hundred bytes) while stopping obvious amplification.
///
/// ```rust
/// let mut options = serde_ptargs::Options::default();
/// options.budget = Some(serde_ptargs::Budget {
///     max_pairs: 2,
///     ..serde_ptargs::Budget::default()
/// });
///
/// let err = serde_ptargs::parse_with_options("a=1;b=2;c=3", &options).unwrap_err();
/// assert_eq!(err.kind(), serde_ptargs::ErrorKind::Budget);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum length of the raw input, checked before scanning.
    ///
    /// Default: 1 MiB
    pub max_input_bytes: usize,
    /// Maximum number of `key=value` pairs.
    ///
    /// Default: 4,096
    pub max_pairs: usize,
    /// Maximum number of distinct keys.
    ///
    /// Default: 1,024
    pub max_keys: usize,
    /// Maximum number of values accumulated under one key.
    ///
    /// Default: 1,024
    pub max_values_per_key: usize,
    /// Maximum decoded length of a single key.
    ///
    /// Default: 1,024
    pub max_key_bytes: usize,
    /// Maximum decoded length of a single value.
    ///
    /// Default: 64 KiB
    pub max_value_bytes: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_input_bytes: 1024 * 1024,
            max_pairs: 4_096,
            max_keys: 1_024,
            max_values_per_key: 1_024,
            max_key_bytes: 1_024,
            max_value_bytes: 64 * 1024,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetBreach {
    /// The input was longer than [`Budget::max_input_bytes`].
    InputBytes { input_bytes: usize },
    /// More pairs than [`Budget::max_pairs`].
    Pairs { pairs: usize },
    /// More distinct keys than [`Budget::max_keys`].
    Keys { keys: usize },
    /// One key collected more values than [`Budget::max_values_per_key`].
    ValuesPerKey { key: String, values: usize },
    /// A decoded key was longer than [`Budget::max_key_bytes`].
    KeyBytes { key_bytes: usize },
    /// A decoded value was longer than [`Budget::max_value_bytes`].
    ValueBytes { key: String, value_bytes: usize },
}

/// Summary of a decode (even if no breach).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// `Some(..)` if a limit was exceeded.
    pub breached: Option<BudgetBreach>,
    /// Length of the raw input.
    pub input_bytes: usize,
    /// Pairs decoded so far.
    pub pairs: usize,
    /// Distinct keys seen so far.
    pub keys: usize,
    /// Largest number of values seen under one key.
    pub max_values_per_key: usize,
    /// Longest decoded key.
    pub max_key_bytes: usize,
    /// Longest decoded value.
    pub max_value_bytes: usize,
}

/// Stateful helper that enforces a [`Budget`] while pairs are decoded.
#[derive(Debug)]
pub struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
}

impl BudgetEnforcer {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
        }
    }

    /// Check the raw input size. Call once, before scanning.
    pub fn observe_input(&mut self, input: &str) -> Result<(), BudgetBreach> {
        self.report.input_bytes = input.len();
        if input.len() > self.budget.max_input_bytes {
            return self.breach(BudgetBreach::InputBytes {
                input_bytes: input.len(),
            });
        }
        Ok(())
    }

    /// Observe one decoded pair. `values_for_key` is the number of values the key holds
    /// including this one, so `1` means the key is new.
    pub fn observe_pair(
        &mut self,
        key: &str,
        value: &str,
        values_for_key: usize,
    ) -> Result<(), BudgetBreach> {
        let report = &mut self.report;
        report.pairs += 1;
        report.max_key_bytes = report.max_key_bytes.max(key.len());
        report.max_value_bytes = report.max_value_bytes.max(value.len());
        report.max_values_per_key = report.max_values_per_key.max(values_for_key);
        if values_for_key == 1 {
            report.keys += 1;
        }

        if report.pairs > self.budget.max_pairs {
            let pairs = report.pairs;
            return self.breach(BudgetBreach::Pairs { pairs });
        }
        if key.len() > self.budget.max_key_bytes {
            return self.breach(BudgetBreach::KeyBytes {
                key_bytes: key.len(),
            });
        }
        if value.len() > self.budget.max_value_bytes {
            return self.breach(BudgetBreach::ValueBytes {
                key: key.to_owned(),
                value_bytes: value.len(),
            });
        }
        if self.report.keys > self.budget.max_keys {
            let keys = self.report.keys;
            return self.breach(BudgetBreach::Keys { keys });
        }
        if values_for_key > self.budget.max_values_per_key {
            return self.breach(BudgetBreach::ValuesPerKey {
                key: key.to_owned(),
                values: values_for_key,
            });
        }
        Ok(())
    }

    fn breach(&mut self, breach: BudgetBreach) -> Result<(), BudgetBreach> {
        log::debug!("argument budget breached: {breach:?}");
        self.report.breached = Some(breach.clone());
        Err(breach)
    }

    /// Consume the enforcer and return the accumulated [`BudgetReport`].
    pub fn finalize(self) -> BudgetReport {
        self.report
    }
}

pub(crate) fn budget_error(breach: BudgetBreach, span: Span) -> Error {
    Error::Budget { breach, span }
}

/// Check an argument string against the given `Budget` without building the mapping.
///
/// Returns:
/// - `Ok(report)`: `report.breached.is_none()` means **within budget**. If
///   `report.breached.is_some()`, you should **reject** the input.
/// - `Err(Error)`: the input is syntactically malformed.
pub fn check_budget(input: &str, budget: &Budget) -> Result<BudgetReport, Error> {
    let mut enforcer = BudgetEnforcer::new(budget.clone());
    if enforcer.observe_input(input).is_err() {
        return Ok(enforcer.finalize());
    }

    // Only per-key counts are needed, not the values themselves.
    let mut counts: ahash::AHashMap<String, usize> = ahash::AHashMap::new();
    for pair in Pairs::new(input) {
        let Pair { key, value, .. } = pair?;
        let count = {
            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };
        if enforcer.observe_pair(&key, &value, count).is_err() {
            break;
        }
    }
    Ok(enforcer.finalize())
}
