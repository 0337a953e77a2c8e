use proptest::prelude::*;

use recall_core::config::BudgetUnit;
use recall_tokens::{Meter, TokenBudget, TokenCounter};

proptest! {
    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::with_default_capacity().unwrap();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::with_default_capacity().unwrap();
        let combined = format!("{a}{b}");
        prop_assert!(counter.count(&combined) <= counter.count(&a) + counter.count(&b) + 1);
    }

    #[test]
    fn budget_never_exceeded(
        items in prop::collection::vec(".{0,80}", 0..30),
        total in 0_usize..300,
        bytes in any::<bool>(),
    ) {
        let unit = if bytes { BudgetUnit::Bytes } else { BudgetUnit::Tokens };
        let meter = Meter::for_unit(unit).unwrap();
        let mut budget = TokenBudget::new(&meter, total);
        for item in &items {
            let before = budget.used();
            match budget.try_consume(item) {
                Some(cost) => prop_assert_eq!(budget.used(), before + cost),
                None => prop_assert_eq!(budget.used(), before),
            }
            prop_assert!(budget.used() <= total);
        }
    }
}
