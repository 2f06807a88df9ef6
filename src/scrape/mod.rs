//! One module per portal page type. Each pairs an async `fetch_*` that goes
//! through [`SessionClient`](crate::client::SessionClient) with a pure
//! `parse_*` over the raw body, so the layout-coupled parsing stays testable
//! against fixtures without a live session.

pub mod class_schedules;
pub mod course_plan;
pub mod exam_schedules;
pub mod grades;
pub mod selection_results;

use scraper::ElementRef;

/// Literal text the portal renders in place of rows when a query matches
/// nothing. Seeing it makes an empty result legitimate rather than a parse
/// failure.
pub(crate) const NO_DATA_MARKER: &str = "未查询到数据";

/// Trimmed text of cell `idx`. Out-of-range reads come back empty: the
/// portal omits trailing columns on some rows and goquery-style extractors
/// treat those as blank fields, not errors.
pub(crate) fn cell_text(cells: &[ElementRef], idx: usize) -> String {
    cells
        .get(idx)
        .map(|cell| element_text(*cell))
        .unwrap_or_default()
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
