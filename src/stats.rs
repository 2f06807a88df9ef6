use std::collections::HashMap;

use crate::models::{GradeRecord, GradeReport, GradeStat, SemesterStat, YearStat};

/// Computes semester-, year- and overall-level credit-weighted GPA
/// aggregates over a full grade list. Nothing is persisted; the report is
/// recomputed per request.
pub fn build_report(grades: Vec<GradeRecord>) -> GradeReport {
    let (semester_stats, year_stats, total_stat) = {
        let mut by_semester: HashMap<&str, Vec<&GradeRecord>> = HashMap::new();
        let mut by_year: HashMap<String, Vec<&GradeRecord>> = HashMap::new();

        for grade in &grades {
            by_semester
                .entry(grade.semester.as_str())
                .or_default()
                .push(grade);
            if let Some(year) = academic_year(&grade.semester) {
                by_year.entry(year).or_default().push(grade);
            }
        }

        let mut semester_stats: Vec<SemesterStat> = by_semester
            .iter()
            .map(|(semester, group)| SemesterStat {
                semester: semester.to_string(),
                stat: stat_for(group),
            })
            .collect();
        semester_stats.sort_by(|a, b| b.semester.cmp(&a.semester));

        let mut year_stats: Vec<YearStat> = by_year
            .iter()
            .map(|(year, group)| YearStat {
                year: year.clone(),
                stat: stat_for(group),
            })
            .collect();
        year_stats.sort_by(|a, b| b.year.cmp(&a.year));

        let all: Vec<&GradeRecord> = grades.iter().collect();
        (semester_stats, year_stats, stat_for(&all))
    };

    GradeReport {
        grades,
        semester_stats,
        year_stats,
        total_stat,
    }
}

/// Academic year key: the first two dash-delimited segments of the semester
/// key ("2023-2024-1" → "2023-2024"). Keys without two segments have no
/// year grouping.
fn academic_year(semester: &str) -> Option<String> {
    let mut parts = semester.split('-');
    let first = parts.next()?;
    let second = parts.next()?;
    Some(format!("{}-{}", first, second))
}

/// Weighted GPA = Σ(gpa × credit) / Σcredit over the rows whose credit
/// parses as a positive number *and* whose GPA parses as non-negative. Rows
/// failing either check enter neither sum but still count toward
/// `course_count`.
fn stat_for(grades: &[&GradeRecord]) -> GradeStat {
    let mut total_credits = 0.0;
    let mut weighted_sum = 0.0;

    for grade in grades {
        let credit = match grade.credit.parse::<f64>() {
            Ok(c) if c > 0.0 => c,
            _ => continue,
        };
        let gpa = match grade.gpa.parse::<f64>() {
            Ok(p) if p >= 0.0 => p,
            _ => continue,
        };
        total_credits += credit;
        weighted_sum += gpa * credit;
    }

    let weighted_gpa = if total_credits > 0.0 {
        weighted_sum / total_credits
    } else {
        0.0
    };

    GradeStat {
        weighted_gpa: round2(weighted_gpa),
        total_credits: round2(total_credits),
        course_count: grades.len(),
    }
}

/// Round half up to two decimals. The 1e-9 nudge keeps decimal values ending
/// in 5, which sit just below the half in binary (2.345 scales to
/// 234.49999…), from rounding down.
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5 + 1e-9).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(semester: &str, credit: &str, gpa: &str) -> GradeRecord {
        GradeRecord {
            semester: semester.to_string(),
            course_code: "306061".to_string(),
            course_name: "网络管理".to_string(),
            score: "92".to_string(),
            credit: credit.to_string(),
            gpa: gpa.to_string(),
            exam_type: "正常考试".to_string(),
            course_prop: "必修".to_string(),
        }
    }

    #[test]
    fn weighted_gpa_over_two_courses() {
        let report = build_report(vec![
            grade("2023-2024-1", "3", "4.0"),
            grade("2023-2024-1", "2", "3.0"),
        ]);
        // (3×4.0 + 2×3.0) / 5 = 3.6
        assert_eq!(report.total_stat.weighted_gpa, 3.6);
        assert_eq!(report.total_stat.total_credits, 5.0);
        assert_eq!(report.total_stat.course_count, 2);
    }

    #[test]
    fn non_numeric_credit_excluded_but_counted() {
        let report = build_report(vec![
            grade("2023-2024-1", "3", "4.0"),
            grade("2023-2024-1", "缓考", "4.0"),
        ]);
        assert_eq!(report.total_stat.weighted_gpa, 4.0);
        assert_eq!(report.total_stat.total_credits, 3.0);
        assert_eq!(report.total_stat.course_count, 2);
    }

    #[test]
    fn invalid_gpa_keeps_credit_out_of_both_sums() {
        let report = build_report(vec![
            grade("2023-2024-1", "3", "4.0"),
            grade("2023-2024-1", "2", "--"),
        ]);
        // The 2-credit row enters neither the numerator nor the denominator.
        assert_eq!(report.total_stat.weighted_gpa, 4.0);
        assert_eq!(report.total_stat.total_credits, 3.0);
        assert_eq!(report.total_stat.course_count, 2);
    }

    #[test]
    fn no_valid_rows_yields_zero_gpa() {
        let report = build_report(vec![grade("2023-2024-1", "0", "4.0")]);
        assert_eq!(report.total_stat.weighted_gpa, 0.0);
        assert_eq!(report.total_stat.total_credits, 0.0);
        assert_eq!(report.total_stat.course_count, 1);
    }

    #[test]
    fn round_half_up_at_two_decimals() {
        assert_eq!(round2(2.345), 2.35);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(3.6), 3.6);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn groups_by_semester_and_year_in_descending_order() {
        let report = build_report(vec![
            grade("2022-2023-2", "2", "3.0"),
            grade("2023-2024-1", "3", "4.0"),
            grade("2023-2024-2", "1", "2.0"),
        ]);

        let semesters: Vec<&str> = report
            .semester_stats
            .iter()
            .map(|s| s.semester.as_str())
            .collect();
        assert_eq!(semesters, vec!["2023-2024-2", "2023-2024-1", "2022-2023-2"]);

        let years: Vec<&str> = report.year_stats.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["2023-2024", "2022-2023"]);

        let recent = &report.year_stats[0].stat;
        // (3×4.0 + 1×2.0) / 4 = 3.5
        assert_eq!(recent.weighted_gpa, 3.5);
        assert_eq!(recent.total_credits, 4.0);
        assert_eq!(recent.course_count, 2);
    }

    #[test]
    fn semester_without_two_segments_skips_year_grouping() {
        let report = build_report(vec![grade("2023", "3", "4.0")]);
        assert!(report.year_stats.is_empty());
        assert_eq!(report.semester_stats.len(), 1);
    }

    #[test]
    fn empty_input() {
        let report = build_report(Vec::new());
        assert!(report.grades.is_empty());
        assert!(report.semester_stats.is_empty());
        assert!(report.year_stats.is_empty());
        assert_eq!(report.total_stat.course_count, 0);
        assert_eq!(report.total_stat.weighted_gpa, 0.0);
    }
}
