use log::info;
use scraper::{Html, Selector};

use crate::client::SessionClient;
use crate::error::FetchError;
use crate::models::SelectionRecord;
use crate::scrape::{cell_text, NO_DATA_MARKER};

const SELECTION_PATH: &str = "/jsxsd/xkgl/loadXsxkjgList";

// A normal selection row carries 10 cells, in record-field order:
// 序号 课程名称 课程编号 上课老师 总学时 学分 课程属性 课程性质 选课操作人 选课时间
const MIN_COLUMNS: usize = 10;

/// Fetches the course-selection results for one term id.
pub async fn fetch_selection_results(
    cookie: &str,
    term: &str,
) -> Result<Vec<SelectionRecord>, FetchError> {
    let client = SessionClient::new(cookie)?;

    info!(
        "fetching selection results (term: {:?}, cookie_len: {})",
        term,
        cookie.len()
    );

    let form = [("xnxqid", term.trim())];
    let body = client.post_form(SELECTION_PATH, &form).await?;
    parse_selection_results(&body)
}

pub fn parse_selection_results(html: &str) -> Result<Vec<SelectionRecord>, FetchError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse(".Nsb_r_list").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(FetchError::ParseFailure(
            "selection table .Nsb_r_list not found",
        ))?;

    let mut results = Vec::new();
    for row in table.select(&tr_selector).skip(1) {
        let cells: Vec<_> = row.select(&td_selector).collect();
        if cells.len() < MIN_COLUMNS {
            continue;
        }
        results.push(SelectionRecord {
            index: cell_text(&cells, 0),
            course_name: cell_text(&cells, 1),
            course_id: cell_text(&cells, 2),
            teacher: cell_text(&cells, 3),
            hours: cell_text(&cells, 4),
            credit: cell_text(&cells, 5),
            course_attr: cell_text(&cells, 6),
            course_prop: cell_text(&cells, 7),
            operator: cell_text(&cells, 8),
            select_time: cell_text(&cells, 9),
        });
    }

    if results.is_empty() {
        if html.contains(NO_DATA_MARKER) {
            return Ok(results);
        }
        return Err(FetchError::ParseFailure(
            "no selection rows and no empty-result marker; upstream layout may have changed",
        ));
    }

    Ok(results)
}
