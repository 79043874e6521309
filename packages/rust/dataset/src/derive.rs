//! Per-row field derivation.
//!
//! Every derived field is a pure function of the raw row; only `overdue`
//! additionally depends on the evaluation instant, which the caller passes
//! in. Date/number parse failures never abort — they null the field.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use docboard_shared::JobDoc;

/// Day-first date formats the published sheet is known to produce.
///
/// `%d.%m.%y` must come before `%d.%m.%Y`: `%Y` happily accepts a
/// two-digit year as-is ("01.03.24" → year 0024), while `%y` maps it into
/// the current century. Four-digit dates leave trailing digits under `%y`
/// and fall through to the next format.
const DATE_FORMATS: [&str; 4] = ["%d.%m.%y", "%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Parse a last-update date using the day-first convention.
pub(crate) fn parse_date_day_first(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a validity period in days (integer or decimal string).
pub(crate) fn parse_validity_days(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    // "nan"/"inf" parse as f64 but are not usable day counts.
    value.is_finite().then_some(value)
}

/// Whether the PDF-path field names an actual file.
///
/// Empty, whitespace-only, and the case-insensitive textual placeholders
/// for "missing" all count as absent.
pub(crate) fn has_pdf(raw: &str) -> bool {
    let trimmed = raw.trim();
    !(trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("missing"))
}

/// Compute `updated_at + validity_days`, honoring fractional days.
fn add_days(updated_at: NaiveDate, days: f64) -> Option<NaiveDateTime> {
    let seconds = (days * 86_400.0).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    updated_at
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::try_seconds(seconds as i64)?)
}

/// Derive one validated record from raw field values.
pub(crate) fn derive_record(
    position: &str,
    department: &str,
    updated_at_raw: &str,
    validity_days_raw: &str,
    pdf_path_raw: &str,
    evaluated_at: NaiveDateTime,
) -> JobDoc {
    let updated_at = parse_date_day_first(updated_at_raw);
    let validity_days = parse_validity_days(validity_days_raw);

    let valid_until = match (updated_at, validity_days) {
        (Some(date), Some(days)) => add_days(date, days),
        _ => None,
    };

    // A record with no computable expiry is not considered overdue.
    let overdue = valid_until.is_some_and(|until| until < evaluated_at);

    JobDoc {
        position: position.to_string(),
        department: department.to_string(),
        updated_at,
        validity_days,
        valid_until,
        overdue,
        has_pdf: has_pdf(pdf_path_raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn day_first_formats_parse() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date_day_first("01.03.2024"), Some(expected));
        assert_eq!(parse_date_day_first("01/03/2024"), Some(expected));
        assert_eq!(parse_date_day_first(" 01.03.24 "), Some(expected));
        assert_eq!(parse_date_day_first("2024-03-01"), Some(expected));
    }

    #[test]
    fn two_digit_years_map_to_current_century() {
        // Year 24 must become 2024, not an expiry in antiquity that would
        // flag the record as overdue.
        assert_eq!(
            parse_date_day_first("01.03.24"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        let doc = derive_record("x", "y", "01.03.24", "365", "a.pdf", at(2024, 6, 1));
        assert_eq!(doc.valid_until, Some(at(2025, 3, 1)));
        assert!(!doc.overdue);
    }

    #[test]
    fn unparseable_date_is_none() {
        assert_eq!(parse_date_day_first("не дата"), None);
        assert_eq!(parse_date_day_first(""), None);
        assert_eq!(parse_date_day_first("32.13.2024"), None);
    }

    #[test]
    fn validity_days_accepts_integer_and_decimal() {
        assert_eq!(parse_validity_days("30"), Some(30.0));
        assert_eq!(parse_validity_days(" 90.5 "), Some(90.5));
        assert_eq!(parse_validity_days("много"), None);
        assert_eq!(parse_validity_days(""), None);
        assert_eq!(parse_validity_days("nan"), None);
    }

    #[test]
    fn pdf_placeholders_count_as_missing() {
        assert!(!has_pdf(""));
        assert!(!has_pdf("  "));
        assert!(!has_pdf("nan"));
        assert!(!has_pdf("NaN"));
        assert!(!has_pdf("MISSING"));
        assert!(has_pdf("docs/engineer.pdf"));
        assert!(has_pdf(" x "));
    }

    #[test]
    fn valid_until_is_sum_of_inputs() {
        let doc = derive_record("Инженер", "ИТ", "01.01.2024", "30", "a.pdf", at(2024, 3, 1));
        assert_eq!(doc.updated_at, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(doc.valid_until, Some(at(2024, 1, 31)));
    }

    #[test]
    fn fractional_days_shift_by_hours() {
        let doc = derive_record("x", "y", "01.01.2024", "0.5", "a.pdf", at(2024, 3, 1));
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(doc.valid_until, Some(expected));
    }

    #[test]
    fn overdue_iff_valid_until_before_evaluation() {
        // Expired one month before evaluation.
        let a = derive_record("x", "y", "01.01.2024", "30", "a.pdf", at(2024, 3, 1));
        assert!(a.overdue);

        // Still current at evaluation.
        let b = derive_record("x", "y", "01.01.2024", "90", "a.pdf", at(2024, 2, 1));
        assert_eq!(b.valid_until, Some(at(2024, 3, 31)));
        assert!(!b.overdue);
    }

    #[test]
    fn none_valid_until_is_never_overdue() {
        // An unparseable date and unparseable days both leave valid_until
        // empty, which must not count as overdue.
        let c = derive_record("x", "y", "не дата", "30", "", at(2024, 3, 1));
        assert_eq!(c.updated_at, None);
        assert_eq!(c.valid_until, None);
        assert!(!c.overdue);

        let d = derive_record("x", "y", "01.01.2024", "скоро", "", at(2024, 3, 1));
        assert_eq!(d.valid_until, None);
        assert!(!d.overdue);
    }

    #[test]
    fn row_survives_with_partial_fields() {
        let doc = derive_record("Инженер", "ИТ", "мусор", "мусор", "  ", at(2024, 3, 1));
        assert_eq!(doc.position, "Инженер");
        assert!(!doc.overdue);
        assert!(!doc.has_pdf);
    }
}
