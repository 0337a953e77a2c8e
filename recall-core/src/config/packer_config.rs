use serde::{Deserialize, Serialize};

use super::defaults;

/// Unit in which the TextPack budget is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetUnit {
    /// cl100k_base tokens.
    #[default]
    Tokens,
    /// UTF-8 bytes.
    Bytes,
}

/// Packer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    pub budget: usize,
    pub budget_unit: BudgetUnit,
    /// Case-insensitive duplicate snippet detection.
    pub dedup_case_insensitive: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            budget: defaults::DEFAULT_PACK_BUDGET,
            budget_unit: BudgetUnit::default(),
            dedup_case_insensitive: defaults::DEFAULT_DEDUP_CASE_INSENSITIVE,
        }
    }
}
