use log::info;
use scraper::{Html, Selector};

use crate::client::SessionClient;
use crate::error::FetchError;
use crate::models::ExamRecord;
use crate::scrape::{cell_text, NO_DATA_MARKER};

const EXAMS_PATH: &str = "/jsxsd/xsks/xsksap_list";

// A normal exam row carries exactly 12 cells, in record-field order:
// 序号 校区 考试场次 课程编号 课程名称 授课教师 考试时间 考场 座位号 准考证号 备注 操作
const MIN_COLUMNS: usize = 12;

/// Fetches the exam schedule for one term id.
pub async fn fetch_exam_schedules(cookie: &str, term: &str) -> Result<Vec<ExamRecord>, FetchError> {
    let client = SessionClient::new(cookie)?;

    info!(
        "fetching exam schedules (term: {:?}, cookie_len: {})",
        term,
        cookie.len()
    );

    let form = [("xnxqid", term.trim())];
    let body = client.post_form(EXAMS_PATH, &form).await?;
    parse_exam_schedules(&body)
}

pub fn parse_exam_schedules(html: &str) -> Result<Vec<ExamRecord>, FetchError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table#dataList").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(FetchError::ParseFailure("exam table #dataList not found"))?;

    let mut schedules = Vec::new();
    for row in table.select(&tr_selector).skip(1) {
        let cells: Vec<_> = row.select(&td_selector).collect();
        if cells.len() < MIN_COLUMNS {
            continue;
        }
        schedules.push(ExamRecord {
            index: cell_text(&cells, 0),
            campus: cell_text(&cells, 1),
            session: cell_text(&cells, 2),
            course_id: cell_text(&cells, 3),
            course_name: cell_text(&cells, 4),
            instructor: cell_text(&cells, 5),
            exam_time: cell_text(&cells, 6),
            exam_room: cell_text(&cells, 7),
            seat_number: cell_text(&cells, 8),
            admission_no: cell_text(&cells, 9),
            remarks: cell_text(&cells, 10),
            operation: cell_text(&cells, 11),
        });
    }

    if schedules.is_empty() {
        if html.contains(NO_DATA_MARKER) {
            return Ok(schedules);
        }
        return Err(FetchError::ParseFailure(
            "no exam rows and no empty-result marker; upstream layout may have changed",
        ));
    }

    Ok(schedules)
}
