//! "Is there another page?" decision table
//!
//! The listing endpoint does not fill its pagination counters consistently, so the
//! answer is picked from whichever evidence the last page carries, in priority order:
//!
//! | Priority | Evidence on last page        | Verdict                                    |
//! |----------|------------------------------|--------------------------------------------|
//! | 1        | `totalCars` is a number      | no more once loaded items ≥ `totalCars`    |
//! | 2        | `page` and `totalPages` both | more iff `page` < `totalPages`             |
//! | 3        | nothing usable               | more iff last page had at least one car    |
//!
//! Row 1 can only stop pagination. While the total has not been reached the next
//! supported row decides, so a server that under-delivers cannot keep `--all`
//! fetching forever.
//!
//! [`select_rules`] lists the rows a page supports and [`MoreRule::verdict`]
//! evaluates one, so each row can be exercised on its own.

use serde::Serialize;

use crate::catalog::CarsResponse;

/// Pagination counters of the most recently received page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub total_items: Option<u64>,
    pub page: Option<u64>,
    pub total_pages: Option<u64>,
    pub item_count: usize,
}

impl From<&CarsResponse> for PageMeta {
    fn from(response: &CarsResponse) -> Self {
        PageMeta {
            total_items: response.total_cars,
            page: response.page,
            total_pages: response.total_pages,
            item_count: response.cars.len(),
        }
    }
}

/// The row of the decision table that applies to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MoreRule {
    TotalItems { total_items: u64 },
    PageCount { page: u64, total_pages: u64 },
    LastPageSize { item_count: usize },
}

impl MoreRule {
    /// Evaluate this row given how many items have been accumulated so far.
    ///
    /// `None` means the row has no verdict and the next row decides.
    pub fn verdict(&self, loaded_items: usize) -> Option<bool> {
        match *self {
            MoreRule::TotalItems { total_items } => {
                ((loaded_items as u64) >= total_items).then_some(false)
            }
            MoreRule::PageCount { page, total_pages } => Some(page < total_pages),
            MoreRule::LastPageSize { item_count } => Some(item_count > 0),
        }
    }
}

/// Rows the page's metadata supports, highest priority first. The last entry is
/// always [`MoreRule::LastPageSize`].
pub fn select_rules(meta: &PageMeta) -> Vec<MoreRule> {
    let mut rules = Vec::with_capacity(3);

    if let Some(total_items) = meta.total_items {
        rules.push(MoreRule::TotalItems { total_items });
    }

    if let (Some(page), Some(total_pages)) = (meta.page, meta.total_pages) {
        rules.push(MoreRule::PageCount { page, total_pages });
    }

    rules.push(MoreRule::LastPageSize {
        item_count: meta.item_count,
    });
    rules
}

/// Outcome of the decision table, kept for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoreDecision {
    pub rule: MoreRule,
    pub has_more: bool,
}

/// Decide whether another page should be requested.
pub fn decide(meta: &PageMeta, loaded_items: usize) -> MoreDecision {
    select_rules(meta)
        .into_iter()
        .find_map(|rule| {
            rule.verdict(loaded_items)
                .map(|has_more| MoreDecision { rule, has_more })
        })
        .unwrap_or(MoreDecision {
            rule: MoreRule::LastPageSize {
                item_count: meta.item_count,
            },
            has_more: meta.item_count > 0,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(
        total_items: Option<u64>,
        page: Option<u64>,
        total_pages: Option<u64>,
        item_count: usize,
    ) -> PageMeta {
        PageMeta {
            total_items,
            page,
            total_pages,
            item_count,
        }
    }

    // ============================================================================
    // select_rules tests
    // ============================================================================

    #[test]
    fn test_select_rules_in_priority_order() {
        let rules = select_rules(&meta(Some(32), Some(1), Some(3), 12));
        assert_eq!(
            rules,
            vec![
                MoreRule::TotalItems { total_items: 32 },
                MoreRule::PageCount {
                    page: 1,
                    total_pages: 3
                },
                MoreRule::LastPageSize { item_count: 12 },
            ]
        );
    }

    #[test]
    fn test_select_rules_page_count_without_total() {
        let rules = select_rules(&meta(None, Some(2), Some(3), 12));
        assert_eq!(
            rules[0],
            MoreRule::PageCount {
                page: 2,
                total_pages: 3
            }
        );
    }

    #[test]
    fn test_select_rules_needs_both_page_fields() {
        let rules = select_rules(&meta(None, Some(2), None, 12));
        assert_eq!(rules, vec![MoreRule::LastPageSize { item_count: 12 }]);

        let rules = select_rules(&meta(None, None, Some(5), 0));
        assert_eq!(rules, vec![MoreRule::LastPageSize { item_count: 0 }]);
    }

    // ============================================================================
    // TotalItems row
    // ============================================================================

    #[test]
    fn test_total_items_row_only_stops() {
        let rule = MoreRule::TotalItems { total_items: 32 };
        assert_eq!(rule.verdict(12), None);
        assert_eq!(rule.verdict(31), None);
        assert_eq!(rule.verdict(32), Some(false));
        assert_eq!(rule.verdict(40), Some(false));
    }

    #[test]
    fn test_total_items_overrides_page_count() {
        // page < totalPages says "more", but every item is already loaded.
        let decision = decide(&meta(Some(12), Some(1), Some(3), 12), 12);
        assert!(!decision.has_more);
        assert!(matches!(decision.rule, MoreRule::TotalItems { .. }));
    }

    #[test]
    fn test_total_items_zero() {
        let decision = decide(&meta(Some(0), None, None, 0), 0);
        assert!(!decision.has_more);
    }

    #[test]
    fn test_total_not_reached_on_last_page_stops() {
        // The server claims 40 cars but its last page leaves us at 30.
        let decision = decide(&meta(Some(40), Some(3), Some(3), 6), 30);
        assert!(!decision.has_more);
        assert_eq!(
            decision.rule,
            MoreRule::PageCount {
                page: 3,
                total_pages: 3
            }
        );
    }

    #[test]
    fn test_total_not_reached_on_empty_page_stops() {
        let decision = decide(&meta(Some(40), None, None, 0), 24);
        assert!(!decision.has_more);
        assert_eq!(decision.rule, MoreRule::LastPageSize { item_count: 0 });
    }

    #[test]
    fn test_total_not_reached_with_pages_left() {
        let decision = decide(&meta(Some(40), Some(2), Some(4), 12), 24);
        assert!(decision.has_more);
        assert!(matches!(decision.rule, MoreRule::PageCount { .. }));
    }

    // ============================================================================
    // PageCount row
    // ============================================================================

    #[test]
    fn test_page_count_row() {
        let rule = MoreRule::PageCount {
            page: 1,
            total_pages: 3,
        };
        assert_eq!(rule.verdict(0), Some(true));

        let rule = MoreRule::PageCount {
            page: 3,
            total_pages: 3,
        };
        assert_eq!(rule.verdict(0), Some(false));
    }

    // ============================================================================
    // LastPageSize row
    // ============================================================================

    #[test]
    fn test_last_page_size_row() {
        assert_eq!(MoreRule::LastPageSize { item_count: 1 }.verdict(100), Some(true));
        assert_eq!(MoreRule::LastPageSize { item_count: 0 }.verdict(100), Some(false));
    }

    #[test]
    fn test_page_meta_from_response() {
        let response = CarsResponse {
            cars: vec![],
            total_cars: Some(5),
            page: None,
            total_pages: Some(1),
        };

        let meta = PageMeta::from(&response);

        assert_eq!(meta.total_items, Some(5));
        assert_eq!(meta.page, None);
        assert_eq!(meta.total_pages, Some(1));
        assert_eq!(meta.item_count, 0);
    }

    #[test]
    fn test_decision_serializes_rule_name() {
        let decision = decide(&meta(None, Some(1), Some(2), 12), 12);
        let json = serde_json::to_value(decision).unwrap();

        assert_eq!(json["rule"]["rule"], "page_count");
        assert_eq!(json["has_more"], true);
    }
}
