//! Dataset builder: decoded CSV text → validated dataset + summary counts.
//!
//! A pure, single-pass transform with two terminal failure states
//! (parse failure, schema failure) and one success state. The raw dataset
//! and all derived fields are rebuilt from scratch on every invocation —
//! the source is a live sheet that may change between reads.

mod derive;
mod parse;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use docboard_shared::{Dataset, JobDoc, Result, Summary};

/// Build the validated dataset from decoded CSV text.
///
/// Steps: parse, validate schema, derive per-row fields, summarize.
/// Dataset-level failures abort entirely (no partial dataset); row-level
/// date/number parse failures null the affected field and the row stays.
///
/// `evaluated_at` is the instant `overdue` is judged against; passing it in
/// keeps derivation deterministic.
pub fn build_dataset(
    text: &str,
    source_url: &str,
    evaluated_at: NaiveDateTime,
) -> Result<Dataset> {
    let table = parse::parse_table(text)?;
    let idx = parse::check_schema(&table.headers)?;

    let mut docs = Vec::with_capacity(table.records.len());
    let mut field_misses = 0usize;

    for record in &table.records {
        let field = |i: usize| record.get(i).unwrap_or_default();
        let doc = derive::derive_record(
            field(idx.position),
            field(idx.department),
            field(idx.updated_at),
            field(idx.validity_days),
            field(idx.pdf_path),
            evaluated_at,
        );

        if doc.updated_at.is_none() || doc.validity_days.is_none() {
            field_misses += 1;
            debug!(
                position = %doc.position,
                raw_date = field(idx.updated_at),
                raw_days = field(idx.validity_days),
                "row field(s) failed to parse, nulled"
            );
        }

        docs.push(doc);
    }

    let summary = Summary {
        total: docs.len(),
        expired: docs.iter().filter(|d| d.overdue).count(),
        missing_pdf: docs.iter().filter(|d| !d.has_pdf).count(),
    };

    info!(
        total = summary.total,
        expired = summary.expired,
        missing_pdf = summary.missing_pdf,
        field_misses,
        "dataset built"
    );

    Ok(Dataset {
        docs,
        summary,
        source_url: source_url.to_string(),
        evaluated_at,
    })
}

/// Records where `overdue` is true, in their original relative order.
///
/// Returns a new sequence; the source is left untouched.
pub fn filter_overdue(docs: &[JobDoc]) -> Vec<JobDoc> {
    docs.iter().filter(|d| d.overdue).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use docboard_shared::DocboardError;

    const HEADER: &str = "Должность,Отдел,Дата обновления,Срок актуальности (дней),Путь к PDF";

    fn eval_at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn build(rows: &str, evaluated: NaiveDateTime) -> Dataset {
        let text = format!("{HEADER}\n{rows}");
        build_dataset(&text, "https://docs.google.com/spreadsheets/d/test", evaluated)
            .expect("build dataset")
    }

    #[test]
    fn derives_and_summarizes_mixed_rows() {
        let ds = build(
            "Инженер,ИТ,01.01.2024,30,docs/engineer.pdf\n\
             Бухгалтер,Финансы,01.01.2024,365,\n\
             Менеджер,Продажи,не дата,90,docs/manager.pdf\n",
            eval_at(2024, 3, 1),
        );

        assert_eq!(ds.summary.total, 3);
        assert_eq!(ds.summary.expired, 1); // only the engineer's doc lapsed
        assert_eq!(ds.summary.missing_pdf, 1);
        assert!(ds.summary.expired <= ds.summary.total);
        assert!(ds.summary.missing_pdf <= ds.summary.total);

        // Insertion order preserved from the source.
        let positions: Vec<&str> = ds.docs.iter().map(|d| d.position.as_str()).collect();
        assert_eq!(positions, ["Инженер", "Бухгалтер", "Менеджер"]);
    }

    #[test]
    fn summary_counts_match_row_flags() {
        let ds = build(
            "А,О,01.01.2020,10,x.pdf\n\
             Б,О,01.01.2020,10,\n\
             В,О,01.01.2030,10,  \n\
             Г,О,плохо,10,nan\n",
            eval_at(2024, 3, 1),
        );
        assert_eq!(ds.summary.expired, ds.docs.iter().filter(|d| d.overdue).count());
        assert_eq!(
            ds.summary.missing_pdf,
            ds.docs.iter().filter(|d| !d.has_pdf).count()
        );
        assert_eq!(ds.summary.missing_pdf, 3);
    }

    #[test]
    fn whitespace_only_pdf_path_counts_as_missing() {
        let ds = build("Инженер,ИТ,01.01.2024,30,  \n", eval_at(2024, 2, 1));
        assert!(!ds.docs[0].has_pdf);
        assert_eq!(ds.summary.missing_pdf, 1);
    }

    #[test]
    fn missing_department_column_fails_with_schema_error() {
        let text = "Должность,Дата обновления,Срок актуальности (дней),Путь к PDF\n\
                    Инженер,01.01.2024,30,a.pdf\n";
        let err = build_dataset(text, "src", eval_at(2024, 3, 1)).unwrap_err();
        match err {
            DocboardError::Schema { missing, found } => {
                assert_eq!(missing, vec!["Отдел".to_string()]);
                assert!(found.contains(&"Должность".to_string()));
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn schema_is_checked_before_row_parsing() {
        // Rows full of garbage must not matter when a column is missing.
        let text = "Отдел\nмусор\nещё мусор\n";
        let err = build_dataset(text, "src", eval_at(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, DocboardError::Schema { .. }));
    }

    #[test]
    fn filter_overdue_preserves_order_without_mutating() {
        let ds = build(
            "А,О,01.01.2020,10,x\n\
             Б,О,01.01.2030,10,x\n\
             В,О,01.06.2020,10,x\n",
            eval_at(2024, 3, 1),
        );

        let before = ds.docs.clone();
        let overdue = filter_overdue(&ds.docs);

        assert_eq!(ds.docs, before);
        assert!(overdue.iter().all(|d| d.overdue));
        let names: Vec<&str> = overdue.iter().map(|d| d.position.as_str()).collect();
        assert_eq!(names, ["А", "В"]);
    }

    #[test]
    fn filter_overdue_never_includes_null_expiry() {
        let ds = build("А,О,не дата,10,x\nБ,О,01.01.2020,мусор,x\n", eval_at(2024, 3, 1));
        assert!(filter_overdue(&ds.docs).is_empty());
    }

    #[test]
    fn empty_table_builds_empty_dataset() {
        let ds = build("", eval_at(2024, 3, 1));
        assert_eq!(ds.summary.total, 0);
        assert_eq!(ds.summary.expired, 0);
        assert_eq!(ds.summary.missing_pdf, 0);
        assert!(ds.docs.is_empty());
    }

    #[test]
    fn source_url_and_evaluation_instant_carried_through() {
        let when = eval_at(2024, 3, 1);
        let ds = build("Инженер,ИТ,01.01.2024,30,a.pdf\n", when);
        assert_eq!(ds.source_url, "https://docs.google.com/spreadsheets/d/test");
        assert_eq!(ds.evaluated_at, when);
    }
}
