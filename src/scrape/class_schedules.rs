use log::info;
use regex::Regex;
use scraper::{Html, Selector};

use crate::client::SessionClient;
use crate::error::FetchError;
use crate::models::{ClassScheduleRecord, ClassScheduleResult};
use crate::timeparse::parse_class_time;

const SCHEDULE_PATH: &str = "/jsxsd/framework/main_index_loadkb.jsp";

// Segment and key/value delimiters of the title-attribute micro-format.
const SEGMENT_DELIMITER: &str = "<br/>";
const KEY_VALUE_DELIMITER: char = '：';

/// Fetches the class schedule for one date (format `YYYY-MM-DD`).
pub async fn fetch_class_schedules(
    cookie: &str,
    date: &str,
) -> Result<ClassScheduleResult, FetchError> {
    let client = SessionClient::new(cookie)?;

    info!(
        "fetching class schedules (date: {:?}, cookie_len: {})",
        date,
        cookie.len()
    );

    let form = [("rq", date.trim())];
    let body = client.post_form(SCHEDULE_PATH, &form).await?;
    parse_class_schedules(&body)
}

/// Parses the schedule page. The week banner lives in a script fragment of
/// the raw body; the courses live in `title` attributes under `.kb_table`.
/// An empty course list with the table present is a valid empty week.
pub fn parse_class_schedules(html: &str) -> Result<ClassScheduleResult, FetchError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse(".kb_table").unwrap();
    let p_selector = Selector::parse("p[title]").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(FetchError::ParseFailure("schedule table .kb_table not found"))?;

    let mut courses = Vec::new();
    for (i, p) in table.select(&p_selector).enumerate() {
        let Some(title) = p.value().attr("title") else {
            continue;
        };
        courses.push(parse_course_title(i + 1, title));
    }

    Ok(ClassScheduleResult {
        current_week_raw: extract_week_banner(html),
        courses,
    })
}

/// One course is a single attribute string of `key：value` pairs separated
/// by a line-break token, e.g.
/// `课程学分：3<br/>课程属性：任选<br/>课程名称：网络管理<br/>上课时间：第18周 星期一 [02-03-04]节<br/>…`.
/// Unknown keys are ignored so a renamed upstream field drops out instead of
/// landing in the wrong slot.
fn parse_course_title(index: usize, title: &str) -> ClassScheduleRecord {
    let mut course = ClassScheduleRecord {
        index,
        ..Default::default()
    };

    for segment in title.split(SEGMENT_DELIMITER) {
        let Some((key, value)) = segment.split_once(KEY_VALUE_DELIMITER) else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "课程学分" => course.credit = value.to_string(),
            "课程属性" => course.category = value.to_string(),
            "课程名称" => course.name = value.to_string(),
            "上课时间" => {
                course.raw_time_string = value.to_string();
                course.time_parsed = parse_class_time(value);
            }
            "上课地点" => course.location = value.to_string(),
            "课堂名称" => course.classes = value.to_string(),
            _ => {}
        }
    }

    course
}

/// The current-week banner is set from a script call like
/// `$("#li_showWeek").html("<span class=\"main_text main_color\">第18周</span>/20周");`.
/// Only span-bearing arguments match, which excludes the plain-text variants
/// the portal emits on error pages. Tags are stripped and escaped quotes
/// unescaped; an absent banner is empty, not an error.
fn extract_week_banner(html: &str) -> String {
    let banner_re =
        Regex::new(r##"\$\("#li_showWeek"\)\.html\("(<span[^>]*>.*?</span>.*?)"\);"##).unwrap();
    let Some(caps) = banner_re.captures(html) else {
        return String::new();
    };

    let tag_re = Regex::new(r"<[^>]+>").unwrap();
    let stripped = tag_re.replace_all(&caps[1], "");
    stripped.replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    const COURSE_TITLE: &str = "课程学分：3<br/>课程属性：任选<br/>课程名称：网络管理\
        <br/>上课时间：第18周 星期一 [02-03-04]节<br/>上课地点：嵌入式实验室204\
        <br/>课堂名称：23网安班,22网安班";

    fn page(banner_script: &str, table_body: &str) -> String {
        format!(
            "<html><head><script>{}</script></head>\
             <body><table class=\"kb_table\">{}</table></body></html>",
            banner_script, table_body
        )
    }

    #[test]
    fn parses_course_from_title_attribute() {
        let html = page(
            "",
            &format!("<tr><td><p title=\"{}\">网络管理</p></td></tr>", COURSE_TITLE),
        );
        let result = parse_class_schedules(&html).unwrap();
        assert_eq!(result.courses.len(), 1);
        let c = &result.courses[0];
        assert_eq!(c.index, 1);
        assert_eq!(c.name, "网络管理");
        assert_eq!(c.credit, "3");
        assert_eq!(c.category, "任选");
        assert_eq!(c.location, "嵌入式实验室204");
        assert_eq!(c.classes, "23网安班,22网安班");
        assert_eq!(c.raw_time_string, "第18周 星期一 [02-03-04]节");
        assert_eq!(c.time_parsed.week, 18);
        assert_eq!(c.time_parsed.day_of_week, 1);
        assert_eq!(c.time_parsed.periods, vec![2, 3, 4]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let course = parse_course_title(1, "课程名称：网络管理<br/>新字段：忽略");
        assert_eq!(course.name, "网络管理");
        assert_eq!(course.credit, "");
    }

    #[test]
    fn segments_without_delimiter_are_skipped() {
        let course = parse_course_title(2, "没有冒号的段<br/>课程学分：2");
        assert_eq!(course.index, 2);
        assert_eq!(course.credit, "2");
    }

    #[test]
    fn week_banner_is_unescaped_and_tag_stripped() {
        let script = r##"$("#li_showWeek").html("<span class=\"main_text main_color\">第18周</span>/20周");"##;
        let html = page(script, "<tr><td></td></tr>");
        let result = parse_class_schedules(&html).unwrap();
        assert_eq!(result.current_week_raw, "第18周/20周");
        assert!(result.courses.is_empty());
    }

    #[test]
    fn non_teaching_week_banner() {
        let script = r##"$("#li_showWeek").html("<span class=\"main_text main_color\">当前日期不在教学周历内</span>");"##;
        let result = parse_class_schedules(&page(script, "")).unwrap();
        assert_eq!(result.current_week_raw, "当前日期不在教学周历内");
    }

    #[test]
    fn plain_text_banner_without_span_is_ignored() {
        // Error pages set the banner to plain text; those must not match.
        let script = r##"$("#li_showWeek").html("当前登录已失效，请重新登录！");"##;
        let result = parse_class_schedules(&page(script, "")).unwrap();
        assert_eq!(result.current_week_raw, "");
    }

    #[test]
    fn empty_table_is_a_valid_empty_week() {
        let result = parse_class_schedules(&page("", "<tr><td></td></tr>")).unwrap();
        assert!(result.courses.is_empty());
        assert_eq!(result.current_week_raw, "");
    }

    #[test]
    fn missing_table_is_parse_failure() {
        assert!(matches!(
            parse_class_schedules("<html><body></body></html>"),
            Err(FetchError::ParseFailure(_))
        ));
    }

    #[test]
    fn courses_are_numbered_in_document_order() {
        let body = "<tr><td><p title=\"课程名称：甲\">甲</p></td>\
                    <td><p title=\"课程名称：乙\">乙</p></td></tr>";
        let result = parse_class_schedules(&page("", body)).unwrap();
        assert_eq!(result.courses[0].index, 1);
        assert_eq!(result.courses[0].name, "甲");
        assert_eq!(result.courses[1].index, 2);
        assert_eq!(result.courses[1].name, "乙");
    }
}
