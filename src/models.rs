use serde::{Deserialize, Serialize};

/// One row of the grade table. Score, credit and GPA stay text: the portal
/// renders placeholders like "缓考" in numeric columns and the statistics
/// layer decides what parses.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GradeRecord {
    /// Teaching term key, `YYYY-YYYY-N`.
    pub semester: String,
    pub course_code: String,
    pub course_name: String,
    pub score: String,
    pub credit: String,
    pub gpa: String,
    pub exam_type: String,
    pub course_prop: String,
}

/// Filter parameters for a grade query, forwarded verbatim as the portal's
/// form fields (`kksj`, `kcxz`, `kcmc`, `xsfs`). Empty strings mean "no
/// filter" upstream.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GradeQuery {
    pub term: String,
    pub course_type: String,
    pub course_name: String,
    pub display_type: String,
}

/// Credit-weighted aggregate over a set of grade rows.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GradeStat {
    pub weighted_gpa: f64,
    pub total_credits: f64,
    /// All rows in the group, including ones excluded from the weighted sums.
    pub course_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SemesterStat {
    pub semester: String,
    pub stat: GradeStat,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YearStat {
    pub year: String,
    pub stat: GradeStat,
}

/// Grade rows plus the statistics bundle computed over them, returned to the
/// caller in one pass.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GradeReport {
    pub grades: Vec<GradeRecord>,
    pub semester_stats: Vec<SemesterStat>,
    pub year_stats: Vec<YearStat>,
    pub total_stat: GradeStat,
}

/// One row of the exam schedule table, in upstream column order.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExamRecord {
    pub index: String,
    pub campus: String,
    pub session: String,
    pub course_id: String,
    pub course_name: String,
    pub instructor: String,
    pub exam_time: String,
    pub exam_room: String,
    pub seat_number: String,
    pub admission_no: String,
    pub remarks: String,
    pub operation: String,
}

/// One row of the course-selection result table, in upstream column order.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SelectionRecord {
    pub index: String,
    pub course_name: String,
    pub course_id: String,
    pub teacher: String,
    pub hours: String,
    pub credit: String,
    pub course_attr: String,
    pub course_prop: String,
    pub operator: String,
    pub select_time: String,
}

/// Structured form of the portal's class-time string, e.g.
/// "第18周 星期一 [02-03-04]节". Unmatched components stay zero/empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassTime {
    pub week: u32,
    /// 1 = Monday … 7 = Sunday, 0 when no day token matched.
    pub day_of_week: u8,
    #[serde(rename = "periodArray")]
    pub periods: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassScheduleRecord {
    /// 1-based position in document order.
    pub index: usize,
    pub name: String,
    pub credit: String,
    pub category: String,
    pub location: String,
    pub classes: String,
    /// The unparsed time string, kept for diagnostics.
    pub raw_time_string: String,
    pub time_parsed: ClassTime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClassScheduleResult {
    /// Week banner as displayed by the portal, e.g. "第18周/20周". Empty when
    /// the page carries no banner.
    pub current_week_raw: String,
    pub courses: Vec<ClassScheduleRecord>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CoursePlanCourse {
    pub course_code: String,
    pub course_name: String,
    /// Completion status, e.g. "已修(优)".
    pub status: String,
    pub course_prop: String,
    pub course_attr: String,
    pub credits: f64,
    pub hours: String,
    /// Term the course is offered in.
    pub term: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CoursePlanGroup {
    pub group_name: String,
    pub required_credits: f64,
    pub earned_credits: f64,
    pub courses: Vec<CoursePlanCourse>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CoursePlan {
    /// Programme objectives, first `span#pymb` block of the plan page.
    pub objectives: String,
    /// Detailed description, second `span#pymb` block when present.
    pub description: String,
    pub groups: Vec<CoursePlanGroup>,
}
