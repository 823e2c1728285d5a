//! degen.tips allowance response types.

use serde::{Deserialize, Serialize};

/// One record from the allowance endpoint. Numeric fields arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllowanceRecord {
    #[serde(default)]
    pub snapshot_day: Option<String>,
    #[serde(default)]
    pub fid: Option<String>,
    #[serde(default)]
    pub tip_allowance: Option<String>,
    #[serde(default)]
    pub remaining_tip_allowance: Option<String>,
}

/// Allowance figures as returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceData {
    pub allowance: u64,
    /// Negative once a user overspends.
    pub remaining: i64,
    pub expiration_timestamp: Option<i64>,
}

/// Leading integer of a decimal string, so `"120.5"` reads as 120.
pub(crate) fn leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits_from = usize::from(raw.starts_with(['-', '+']));
    let end = raw[digits_from..].find(|c: char| !c.is_ascii_digit()).map_or(raw.len(), |i| i + digits_from);
    if end == digits_from {
        return None;
    }
    raw[..end].parse().ok()
}

impl AllowanceRecord {
    /// Both figures, when present and numeric. A zero daily allowance counts as missing.
    pub fn figures(&self) -> Option<(u64, i64)> {
        let allowance = self.tip_allowance.as_deref().and_then(leading_int)?;
        let remaining = self.remaining_tip_allowance.as_deref().and_then(leading_int)?;
        let allowance = u64::try_from(allowance).ok().filter(|a| *a > 0)?;
        Some((allowance, remaining))
    }
}
