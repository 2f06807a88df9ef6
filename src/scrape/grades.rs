use log::info;
use scraper::{Html, Selector};

use crate::client::SessionClient;
use crate::error::FetchError;
use crate::models::{GradeQuery, GradeRecord, GradeReport};
use crate::scrape::{cell_text, NO_DATA_MARKER};
use crate::stats;

const GRADES_PATH: &str = "/jsxsd/kscj/cjcx_list";

// Column layout of the #dataList grade table. Indices are the upstream
// contract: the table interleaves presentation columns we skip over.
const COL_SEMESTER: usize = 1;
const COL_COURSE_CODE: usize = 2;
const COL_COURSE_NAME: usize = 3;
const COL_SCORE: usize = 5;
const COL_CREDIT: usize = 7;
const COL_GPA: usize = 9;
const COL_EXAM_TYPE: usize = 11;
const COL_COURSE_PROP: usize = 14;

// Rows with fewer cells are placeholder/malformed rows, skipped silently.
const MIN_COLUMNS: usize = 10;

/// Fetches the grade table for the given filters and returns the rows
/// together with semester/year/overall weighted-GPA statistics.
pub async fn fetch_grades(cookie: &str, query: &GradeQuery) -> Result<GradeReport, FetchError> {
    let client = SessionClient::new(cookie)?;

    info!(
        "fetching grades (term: {:?}, course_type: {:?}, cookie_len: {})",
        query.term,
        query.course_type,
        cookie.len()
    );

    let form = [
        ("kksj", query.term.trim()),
        ("kcxz", query.course_type.trim()),
        ("kcmc", query.course_name.trim()),
        ("xsfs", query.display_type.trim()),
    ];
    let body = client.post_form(GRADES_PATH, &form).await?;

    let grades = parse_grades(&body)?;
    Ok(stats::build_report(grades))
}

/// Parses the grade table out of a page body that already passed the
/// session-validity check.
pub fn parse_grades(html: &str) -> Result<Vec<GradeRecord>, FetchError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table#dataList").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(FetchError::ParseFailure("grade table #dataList not found"))?;

    let mut grades = Vec::new();
    for row in table.select(&tr_selector).skip(1) {
        let cells: Vec<_> = row.select(&td_selector).collect();
        if cells.len() < MIN_COLUMNS {
            continue;
        }
        grades.push(GradeRecord {
            semester: cell_text(&cells, COL_SEMESTER),
            course_code: cell_text(&cells, COL_COURSE_CODE),
            course_name: cell_text(&cells, COL_COURSE_NAME),
            score: cell_text(&cells, COL_SCORE),
            credit: cell_text(&cells, COL_CREDIT),
            gpa: cell_text(&cells, COL_GPA),
            exam_type: cell_text(&cells, COL_EXAM_TYPE),
            course_prop: cell_text(&cells, COL_COURSE_PROP),
        });
    }

    if grades.is_empty() {
        // Zero rows is only a legitimate outcome when the portal said so.
        if html.contains(NO_DATA_MARKER) {
            return Ok(grades);
        }
        return Err(FetchError::ParseFailure(
            "no grade rows and no empty-result marker; upstream layout may have changed",
        ));
    }

    Ok(grades)
}
