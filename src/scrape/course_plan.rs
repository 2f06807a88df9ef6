use log::info;
use regex::Regex;
use scraper::{Html, Selector};

use crate::client::SessionClient;
use crate::error::FetchError;
use crate::models::{CoursePlan, CoursePlanCourse, CoursePlanGroup};
use crate::scrape::{cell_text, element_text};

const COURSE_PLAN_PATH: &str = "/jsxsd/pyfa/topyfamx";

// Subtotal rows repeat the group's credit sums and carry no course.
const SUBTOTAL_MARKER: &str = "小计";

// A group-header row fuses the group name with its credit summary in the
// first cell, e.g. "通识课-健康课组 (应修 2 / 已修 1)". Both markers present
// means a new group starts on this row.
const REQUIRED_MARKER: &str = "应修";
const EARNED_MARKER: &str = "已修";

// The first cell of a header row spans the group, so course fields start
// one column later than on continuation rows, where the first cell is a
// spacer.
const HEADER_COURSE_OFFSET: usize = 2;
const CONTINUATION_COURSE_OFFSET: usize = 1;

/// Fetches the student's course plan (programme of study). Single GET, no
/// form fields.
pub async fn fetch_course_plan(cookie: &str) -> Result<CoursePlan, FetchError> {
    let client = SessionClient::new(cookie)?;

    info!("fetching course plan (cookie_len: {})", cookie.len());

    let body = client.get(COURSE_PLAN_PATH).await?;
    parse_course_plan(&body)
}

pub fn parse_course_plan(html: &str) -> Result<CoursePlan, FetchError> {
    let document = Html::parse_document(html);

    // The page carries two span#pymb blocks: programme objectives first,
    // detailed description second (absent on some plans).
    let pymb_selector = Selector::parse("span#pymb").unwrap();
    let mut pymb = document.select(&pymb_selector);
    let objectives = pymb.next().map(element_text).unwrap_or_default();
    let description = pymb.next().map(element_text).unwrap_or_default();

    let groups = parse_groups(&document)?;

    Ok(CoursePlan {
        objectives,
        description,
        groups,
    })
}

/// Walks the plan table once, accumulating courses into the currently open
/// group. A header row flushes the previous group and opens a new one; a
/// continuation row appends to the open group, or is dropped when no group
/// has opened yet.
fn parse_groups(document: &Html) -> Result<Vec<CoursePlanGroup>, FetchError> {
    let table_selector = Selector::parse("table#mxh").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();
    let th_selector = Selector::parse("th").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(FetchError::ParseFailure("course plan table #mxh not found"))?;

    let mut groups: Vec<CoursePlanGroup> = Vec::new();
    let mut current: Option<CoursePlanGroup> = None;

    for row in table.select(&tr_selector) {
        // Column-header rows are the only ones using <th> cells.
        if row.select(&th_selector).next().is_some() {
            continue;
        }
        let row_text: String = row.text().collect();
        if row_text.contains(SUBTOTAL_MARKER) {
            continue;
        }

        let cells: Vec<_> = row.select(&td_selector).collect();
        if cells.is_empty() {
            continue;
        }

        let first_cell = cell_text(&cells, 0);
        let is_new_group =
            first_cell.contains(REQUIRED_MARKER) && first_cell.contains(EARNED_MARKER);

        let offset = if is_new_group {
            if let Some(group) = current.take() {
                groups.push(group);
            }
            let (group_name, required_credits, earned_credits) = parse_group_header(&first_cell);
            current = Some(CoursePlanGroup {
                group_name,
                required_credits,
                earned_credits,
                courses: Vec::new(),
            });
            HEADER_COURSE_OFFSET
        } else {
            CONTINUATION_COURSE_OFFSET
        };

        // A header row with no course cells still opens its group.
        if cells.len() <= offset + 5 {
            continue;
        }

        let course = CoursePlanCourse {
            course_code: cell_text(&cells, offset),
            course_name: cell_text(&cells, offset + 1),
            status: cell_text(&cells, offset + 2),
            course_prop: cell_text(&cells, offset + 3),
            course_attr: cell_text(&cells, offset + 4),
            credits: cell_text(&cells, offset + 5).parse().unwrap_or(0.0),
            // The hour-breakdown column count varies between plans, so the
            // two trailing fields are addressed from the row end.
            hours: cell_text(&cells, cells.len() - 2),
            term: cell_text(&cells, cells.len() - 1),
        };

        if let Some(group) = current.as_mut() {
            if !course.course_name.is_empty() {
                group.courses.push(course);
            }
        }
    }

    if let Some(group) = current.take() {
        groups.push(group);
    }

    if groups.is_empty() {
        return Err(FetchError::ParseFailure(
            "no course plan groups parsed; upstream layout may have changed",
        ));
    }

    Ok(groups)
}

/// Splits "通识课-健康课组 (应修 2 / 已修 1)" into the group name and the two
/// credit totals. Rows that carry the markers but not the full pattern fall
/// back to the whole text as name with zero credits.
fn parse_group_header(text: &str) -> (String, f64, f64) {
    let header_re =
        Regex::new(r"(.*?)\s*[（(]应修\s*([\d.]+)\s*/\s*已修\s*([\d.]+)[)）]").unwrap();
    match header_re.captures(text) {
        Some(caps) => (
            caps[1].trim().to_string(),
            caps[2].parse().unwrap_or(0.0),
            caps[3].parse().unwrap_or(0.0),
        ),
        None => (text.to_string(), 0.0, 0.0),
    }
}
