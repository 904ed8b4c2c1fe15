//! Footer summary and paging options.

use crate::config::Resources;

/// Choices offered by the per-page selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Upper bound on entries in the page dropdown.
pub const MAX_PAGE_OPTIONS: usize = 10_000;

/// Fill the `{0}`, `{1}` and `{2}` slots of the "showing" resource.
pub fn showing_text(template: &str, start: usize, items_per_page: usize, filtered_total: usize) -> String {
    let first = (start + 1).min(filtered_total);
    let last = (start + items_per_page).min(filtered_total);
    template
        .replacen("{0}", &first.to_string(), 1)
        .replacen("{1}", &last.to_string(), 1)
        .replacen("{2}", &filtered_total.to_string(), 1)
}

/// Pages listed in the page dropdown.
pub fn page_options(page_total: usize) -> Vec<usize> {
    (1..=page_total.min(MAX_PAGE_OPTIONS)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterSummary {
    pub showing: String,
    /// Paging buttons and the page dropdown are shown.
    pub show_paging: bool,
    pub current_page: usize,
    /// Empty when the page dropdown is disabled.
    pub page_options: Vec<usize>,
}

pub fn footer_summary(
    resources: &Resources,
    start: usize,
    items_per_page: usize,
    filtered_total: usize,
    page_total: usize,
    page_dropdown: bool,
) -> FooterSummary {
    let current_page = if items_per_page == 0 {
        1
    } else {
        start / items_per_page + 1
    };
    FooterSummary {
        showing: showing_text(&resources.showing, start, items_per_page, filtered_total),
        show_paging: filtered_total > items_per_page,
        current_page,
        page_options: if page_dropdown {
            page_options(page_total)
        } else {
            Vec::new()
        },
    }
}
