use recall_core::config::BudgetUnit;
use recall_core::errors::RecallResult;

use super::counter::TokenCounter;

/// Measures text in the configured budget unit.
#[derive(Debug, Clone)]
pub enum Meter {
    Tokens(TokenCounter),
    Bytes,
}

impl Meter {
    pub fn for_unit(unit: BudgetUnit) -> RecallResult<Self> {
        match unit {
            BudgetUnit::Tokens => Ok(Self::Tokens(TokenCounter::with_default_capacity()?)),
            BudgetUnit::Bytes => Ok(Self::Bytes),
        }
    }

    pub fn unit(&self) -> BudgetUnit {
        match self {
            Self::Tokens(_) => BudgetUnit::Tokens,
            Self::Bytes => BudgetUnit::Bytes,
        }
    }

    pub fn measure(&self, text: &str) -> usize {
        match self {
            Self::Tokens(counter) => counter.count_cached(text),
            Self::Bytes => text.len(),
        }
    }
}

/// A running budget. Items are admitted whole or not at all.
#[derive(Debug)]
pub struct TokenBudget<'a> {
    meter: &'a Meter,
    total: usize,
    used: usize,
}

impl<'a> TokenBudget<'a> {
    pub fn new(meter: &'a Meter, total: usize) -> Self {
        Self {
            meter,
            total,
            used: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.used)
    }

    /// Whether `text` fits in what is left.
    pub fn fits(&self, text: &str) -> bool {
        self.meter.measure(text) <= self.remaining()
    }

    /// Admit `text` if it fits, returning its cost. Nothing is consumed
    /// otherwise.
    pub fn try_consume(&mut self, text: &str) -> Option<usize> {
        let cost = self.meter.measure(text);
        if cost <= self.remaining() {
            self.used += cost;
            Some(cost)
        } else {
            None
        }
    }
}
