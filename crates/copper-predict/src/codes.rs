//! Category code tables.
//!
//! Static mappings from the labels a host presents to the numeric codes the
//! models were trained on, plus the two enumerated code sets (application and
//! country) that are passed through unchanged once their membership is
//! checked. All tables are immutable statics.

use thiserror::Error;

/// A categorical value that is not present in its table or code set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {table} label {label:?}")]
pub struct UnknownLabelError {
    /// Name of the table or code set that was consulted.
    pub table: &'static str,
    /// The offending label, as supplied (numeric codes are formatted).
    pub label: String,
}

// =============================================================================
// CodeTable
// =============================================================================

/// Immutable label → code mapping.
///
/// Entries are kept in presentation order, which is the order a host should
/// offer them in a dropdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeTable {
    name: &'static str,
    entries: &'static [(&'static str, f64)],
}

impl CodeTable {
    const fn new(name: &'static str, entries: &'static [(&'static str, f64)]) -> Self {
        Self { name, entries }
    }

    /// Table name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the code for a label (exact, case-sensitive match).
    pub fn lookup(&self, label: &str) -> Result<f64, UnknownLabelError> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|&(_, code)| code)
            .ok_or_else(|| UnknownLabelError {
                table: self.name,
                label: label.to_string(),
            })
    }

    /// Reverse lookup: the label assigned to `code`, if any.
    pub fn label_for(&self, code: f64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|&&(_, c)| c == code)
            .map(|&(l, _)| l)
    }

    /// Labels in presentation order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(l, _)| l)
    }

    /// `(label, code)` pairs in presentation order.
    pub fn entries(&self) -> &'static [(&'static str, f64)] {
        self.entries
    }
}

/// Item type codes.
pub static ITEM_TYPE: CodeTable = CodeTable::new(
    "item type",
    &[
        ("W", 5.0),
        ("S", 3.0),
        ("Others", 1.0),
        ("PL", 2.0),
        ("WI", 6.0),
        ("IPL", 0.0),
        ("SLAWR", 4.0),
    ],
);

/// Deal status codes used as a regression input.
pub static STATUS: CodeTable = CodeTable::new(
    "status",
    &[
        ("Won", 7.0),
        ("Draft", 0.0),
        ("To be approved", 6.0),
        ("Lost", 1.0),
        ("Not lost for AM", 2.0),
        ("Wonderful", 8.0),
        ("Revised", 5.0),
        ("Offered", 4.0),
        ("Offerable", 3.0),
    ],
);

/// Classification outcome codes (output side).
pub static OUTCOME: CodeTable = CodeTable::new("outcome", &[("Won", 1.0), ("Lost", 0.0)]);

/// Look up `label` in `table`.
#[inline]
pub fn lookup(table: &CodeTable, label: &str) -> Result<f64, UnknownLabelError> {
    table.lookup(label)
}

// =============================================================================
// CodeSet
// =============================================================================

/// Enumerated set of allowed numeric codes.
///
/// Members are passed to the model as-is; the set only gates which values a
/// host may submit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeSet {
    name: &'static str,
    codes: &'static [f64],
}

impl CodeSet {
    const fn new(name: &'static str, codes: &'static [f64]) -> Self {
        Self { name, codes }
    }

    /// Set name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Allowed codes in presentation order.
    pub fn codes(&self) -> &'static [f64] {
        self.codes
    }

    /// Returns true if `code` is a member.
    pub fn contains(&self, code: f64) -> bool {
        self.codes.contains(&code)
    }

    /// Return `code` unchanged if it is a member.
    pub fn check(&self, code: f64) -> Result<f64, UnknownLabelError> {
        if self.contains(code) {
            Ok(code)
        } else {
            Err(UnknownLabelError {
                table: self.name,
                label: code.to_string(),
            })
        }
    }
}

/// Allowed application codes.
pub static APPLICATION: CodeSet = CodeSet::new(
    "application",
    &[
        10.0, 41.0, 28.0, 59.0, 15.0, 4.0, 38.0, 56.0, 42.0, 26.0, 27.0, 19.0, 20.0, 66.0, 29.0,
        22.0, 40.0, 25.0, 67.0, 79.0, 3.0, 99.0, 2.0, 5.0, 39.0, 69.0, 70.0, 65.0, 58.0, 68.0,
    ],
);

/// Allowed country codes.
pub static COUNTRY: CodeSet = CodeSet::new(
    "country",
    &[
        28.0, 25.0, 30.0, 32.0, 38.0, 78.0, 27.0, 77.0, 113.0, 79.0, 26.0, 39.0, 40.0, 84.0, 80.0,
        107.0, 89.0,
    ],
);
