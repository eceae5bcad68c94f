//! Ranking and pagination for scored opportunity listings.

use serde::Deserialize;

use crate::domain::ScoredOpportunity;
use crate::port::Page;

/// Key to sort a scored listing by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Score,
    Var,
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Sort a scored batch by the given key and direction.
///
/// The sort is stable: items with equal keys keep their input order, so
/// storage order is the tie-break.
#[must_use]
pub fn rank(
    mut items: Vec<ScoredOpportunity>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<ScoredOpportunity> {
    items.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Score => a.result.score.cmp(&b.result.score),
            SortKey::Var => a.opportunity.var_usd().cmp(&b.opportunity.var_usd()),
            SortKey::CreatedAt => a.opportunity.created_at().cmp(&b.opportunity.created_at()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    items
}

/// Slice one 1-based page out of an already-filtered list.
///
/// Pagination is independent of scoring; a zero page size yields an empty
/// page rather than the whole list.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: Page) -> Vec<T> {
    if page.size == 0 {
        return Vec::new();
    }
    let number = page.number.max(1);
    items
        .iter()
        .skip((number - 1) * page.size)
        .take(page.size)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Opportunity, OpportunityKind, ScoreBreakdown, ScoreResult, ScoredOpportunity,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 12, minute, 0).unwrap()
    }

    fn scored(id: &str, score: u8, var_usd: Decimal, minute: u32) -> ScoredOpportunity {
        let opportunity = Opportunity::builder()
            .id(id)
            .kind(OpportunityKind::Arb)
            .asset("ETH")
            .var_usd(var_usd)
            .created_at(ts(minute))
            .build()
            .unwrap();
        ScoredOpportunity {
            opportunity,
            result: ScoreResult {
                score,
                consensus: 0.0,
                blocking: Vec::new(),
                breakdown: ScoreBreakdown {
                    base: i64::from(score),
                    consensus_adj: 0,
                    guardrail_penalty: 0,
                    var_penalty: 0,
                },
            },
        }
    }

    fn ids(items: &[ScoredOpportunity]) -> Vec<&str> {
        items.iter().map(|s| s.opportunity.id().as_str()).collect()
    }

    #[test]
    fn ranks_by_score_descending_by_default_keys() {
        let items = vec![
            scored("a", 40, dec!(100), 0),
            scored("b", 90, dec!(200), 1),
            scored("c", 70, dec!(300), 2),
        ];
        let ranked = rank(items, SortKey::Score, SortDirection::Desc);
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let items = vec![
            scored("a", 50, dec!(100), 0),
            scored("b", 50, dec!(100), 0),
            scored("c", 50, dec!(100), 0),
        ];
        let desc = rank(items.clone(), SortKey::Score, SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["a", "b", "c"]);
        let asc = rank(items, SortKey::Score, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["a", "b", "c"]);
    }

    #[test]
    fn ranks_by_var_and_created_at() {
        let items = vec![
            scored("a", 40, dec!(300), 2),
            scored("b", 90, dec!(100), 0),
            scored("c", 70, dec!(200), 1),
        ];
        let by_var = rank(items.clone(), SortKey::Var, SortDirection::Asc);
        assert_eq!(ids(&by_var), vec!["b", "c", "a"]);

        let newest_first = rank(items, SortKey::CreatedAt, SortDirection::Desc);
        assert_eq!(ids(&newest_first), vec!["a", "c", "b"]);
    }

    #[test]
    fn paginate_slices_one_based_pages() {
        let items: Vec<i32> = (1..=7).collect();
        let page = |number, size| Page { number, size };

        assert_eq!(paginate(&items, page(1, 3)), vec![1, 2, 3]);
        assert_eq!(paginate(&items, page(2, 3)), vec![4, 5, 6]);
        assert_eq!(paginate(&items, page(3, 3)), vec![7]);
        assert_eq!(paginate(&items, page(4, 3)), Vec::<i32>::new());
        // Page zero clamps to the first page.
        assert_eq!(paginate(&items, page(0, 3)), vec![1, 2, 3]);
        assert_eq!(paginate(&items, page(1, 0)), Vec::<i32>::new());
    }
}
