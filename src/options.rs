use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::budget::{Budget, BudgetReport};

pub type BudgetReportCallback = Rc<RefCell<dyn FnMut(BudgetReport) + 'static>>;

/// Decoder configuration options.
///
/// Use this to set an argument [`Budget`], observe the budget report, and control how
/// errors are rendered.
///
/// Example: decode into a small `Config` with a tighter budget.
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Config {
///     cert: String,
///     #[serde(rename = "iat-mode")]
///     iat_mode: u8,
/// }
///
/// let options = serde_ptargs::options! {
///     budget: Some(serde_ptargs::budget! {
///         max_pairs: 8,
///     }),
/// };
///
/// let cfg: Config =
///     serde_ptargs::from_str_with_options("cert=AAAA;iat-mode=1", options).unwrap();
/// assert_eq!(cfg.iat_mode, 1);
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Options {
    /// Optional budget enforced while decoding.
    pub budget: Option<Budget>,
    /// Optional callback invoked with the final budget report after decoding, whether the
    /// decode succeeded or not. Only invoked when `budget` is set.
    #[serde(skip)]
    pub budget_report: Option<fn(&BudgetReport)>,
    /// Closure variant of [`Options::budget_report`]; see [`Options::with_budget_report`].
    #[serde(skip)]
    pub budget_report_cb: Option<BudgetReportCallback>,
    /// If true (default), errors with a known span are wrapped with a rendered snippet of
    /// the input.
    pub with_snippet: bool,
    /// Horizontal crop radius (in characters) around the error when rendering snippets.
    /// If set to `0`, snippet wrapping is disabled.
    pub crop_radius: usize,
}

impl Options {
    /// Registers a budget-report callback. Any closure can be used, including ones that
    /// capture state from the surrounding scope.
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let pairs = Rc::new(Cell::new(0));
    /// let seen = pairs.clone();
    /// let options = serde_ptargs::Options::default()
    ///     .with_budget_report(move |report| seen.set(report.pairs));
    ///
    /// serde_ptargs::parse_with_options("a=1;b=2", &options).unwrap();
    /// assert_eq!(pairs.get(), 2);
    /// ```
    pub fn with_budget_report<F>(mut self, cb: F) -> Self
    where
        F: FnMut(BudgetReport) + 'static,
    {
        self.budget_report_cb = Some(Rc::new(RefCell::new(cb)));
        self
    }

    pub(crate) fn report_budget(&self, report: BudgetReport) {
        if let Some(report_fn) = self.budget_report {
            report_fn(&report);
        }
        if let Some(cb) = &self.budget_report_cb {
            let mut cb = cb.borrow_mut();
            (*cb)(report);
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            budget_report: None,
            budget_report_cb: None,
            with_snippet: true,
            crop_radius: 64,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("budget", &self.budget)
            .field("budget_report", &self.budget_report)
            .field(
                "budget_report_cb",
                &if self.budget_report_cb.is_some() {
                    "set"
                } else {
                    "none"
                },
            )
            .field("with_snippet", &self.with_snippet)
            .field("crop_radius", &self.crop_radius)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert_eq!(opts.budget, Some(Budget::default()));
        assert!(opts.budget_report.is_none());
        assert!(opts.budget_report_cb.is_none());
        assert!(opts.with_snippet);
        assert_eq!(opts.crop_radius, 64);
    }

    #[test]
    fn test_options_debug_format() {
        let opts = Options::default();
        let debug_str = format!("{:?}", opts);
        assert!(debug_str.contains("Options"));
        assert!(debug_str.contains("budget"));
        assert!(debug_str.contains("budget_report_cb: \"none\""));

        let opts_with_cb = opts.with_budget_report(|_| {});
        let debug_str_cb = format!("{:?}", opts_with_cb);
        assert!(debug_str_cb.contains("budget_report_cb: \"set\""));
    }

    #[test]
    fn report_reaches_both_callbacks() {
        thread_local! {
            static FN_CALLS: Cell<usize> = const { Cell::new(0) };
        }
        fn count(_: &BudgetReport) {
            FN_CALLS.with(|c| c.set(c.get() + 1));
        }

        let breached = Rc::new(Cell::new(false));
        let seen = breached.clone();
        let mut opts = Options::default().with_budget_report(move |r| {
            seen.set(r.breached.is_some());
        });
        opts.budget_report = Some(count);
        opts.budget = Some(Budget {
            max_keys: 0,
            ..Budget::default()
        });

        assert!(crate::parse_with_options("a=1", &opts).is_err());
        assert!(breached.get());
        assert_eq!(FN_CALLS.with(Cell::get), 1);
    }

    #[test]
    fn options_roundtrip_through_json() {
        let opts = crate::options! { crop_radius: 10, with_snippet: false };
        let json = serde_json::to_string(&opts).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back.crop_radius, 10);
        assert!(!back.with_snippet);
        assert_eq!(back.budget, Some(Budget::default()));
    }
}
