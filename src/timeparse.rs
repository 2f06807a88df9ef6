use regex::Regex;

use crate::models::ClassTime;

// Day-name tokens as the portal prints them, mapped to ISO weekday numbers.
const DAY_NAMES: [(&str, u8); 7] = [
    ("星期一", 1),
    ("星期二", 2),
    ("星期三", 3),
    ("星期四", 4),
    ("星期五", 5),
    ("星期六", 6),
    ("星期日", 7),
];

/// Parses the portal's free-text class-time format, e.g.
/// "第18周 星期一 [02-03-04]节" → week 18, Monday, periods [2, 3, 4].
///
/// Components that fail to match default to zero/empty instead of erroring;
/// the surrounding record keeps the raw string for diagnostics.
pub fn parse_class_time(raw: &str) -> ClassTime {
    let mut time = ClassTime::default();

    let week_re = Regex::new(r"第(\d+)周").unwrap();
    if let Some(caps) = week_re.captures(raw) {
        time.week = caps[1].parse().unwrap_or(0);
    }

    for (name, number) in DAY_NAMES {
        if raw.contains(name) {
            time.day_of_week = number;
            break;
        }
    }

    // Bracketed hyphen run like [02-03-04]; runs that fail to parse as
    // integers are dropped, not errored.
    let period_re = Regex::new(r"\[([\d-]+)\]").unwrap();
    if let Some(caps) = period_re.captures(raw) {
        time.periods = caps[1].split('-').filter_map(|p| p.parse().ok()).collect();
    }

    time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_time_string() {
        let time = parse_class_time("第18周 星期一 [02-03-04]节");
        assert_eq!(time.week, 18);
        assert_eq!(time.day_of_week, 1);
        assert_eq!(time.periods, vec![2, 3, 4]);
    }

    #[test]
    fn sunday_and_single_period() {
        let time = parse_class_time("第3周 星期日 [11]节");
        assert_eq!(time.week, 3);
        assert_eq!(time.day_of_week, 7);
        assert_eq!(time.periods, vec![11]);
    }

    #[test]
    fn missing_components_default_to_zero() {
        let time = parse_class_time("星期三");
        assert_eq!(time.week, 0);
        assert_eq!(time.day_of_week, 3);
        assert!(time.periods.is_empty());
    }

    #[test]
    fn garbage_never_errors() {
        let time = parse_class_time("时间待定");
        assert_eq!(time, ClassTime::default());
    }

    #[test]
    fn empty_string() {
        assert_eq!(parse_class_time(""), ClassTime::default());
    }
}
