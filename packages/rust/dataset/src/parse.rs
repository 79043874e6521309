//! CSV parsing and schema validation.
//!
//! Splits decoded text into a header row plus raw records, then checks the
//! five required columns once, before any row-level work. Column names are
//! compared after trimming surrounding whitespace; extra columns are
//! carried along but ignored by derivation.

use csv::StringRecord;

use docboard_shared::{
    COL_DEPARTMENT, COL_PDF_PATH, COL_POSITION, COL_UPDATED_AT, COL_VALIDITY_DAYS, DocboardError,
    REQUIRED_COLUMNS, Result,
};

/// Field positions of the required columns within a raw record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnIndex {
    pub position: usize,
    pub department: usize,
    pub updated_at: usize,
    pub validity_days: usize,
    pub pdf_path: usize,
}

/// Parsed table: trimmed header names plus raw records in source order.
#[derive(Debug)]
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

/// Parse decoded CSV text into a raw table.
///
/// Malformed CSV (e.g. a row whose field count disagrees with the header)
/// is a fatal [`DocboardError::Parse`], distinct from a schema failure.
pub(crate) fn parse_table(text: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DocboardError::parse(format!("invalid header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let record = row.map_err(|e| DocboardError::parse(e.to_string()))?;
        records.push(record);
    }

    Ok(RawTable { headers, records })
}

/// Confirm all required columns are present and resolve their positions.
///
/// Absence of any required column is fatal for the whole dataset; the error
/// lists exactly the missing names plus everything actually found, so the
/// user can fix the source.
pub(crate) fn check_schema(headers: &[String]) -> Result<ColumnIndex> {
    let find = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| find(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DocboardError::Schema {
            missing,
            found: headers.to_vec(),
        });
    }

    // Positions are guaranteed by the check above.
    Ok(ColumnIndex {
        position: find(COL_POSITION).unwrap_or_default(),
        department: find(COL_DEPARTMENT).unwrap_or_default(),
        updated_at: find(COL_UPDATED_AT).unwrap_or_default(),
        validity_days: find(COL_VALIDITY_DAYS).unwrap_or_default(),
        pdf_path: find(COL_PDF_PATH).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_before_matching() {
        let text = " Должность , Отдел ,Дата обновления,Срок актуальности (дней),Путь к PDF\n\
                    Инженер,ИТ,01.03.2024,180,a.pdf\n";
        let table = parse_table(text).expect("parse");
        assert_eq!(table.headers[0], "Должность");

        let idx = check_schema(&table.headers).expect("schema");
        assert_eq!(idx.position, 0);
        assert_eq!(idx.department, 1);
    }

    #[test]
    fn extra_columns_are_preserved_but_ignored() {
        let text = "Должность,Отдел,Дата обновления,Срок актуальности (дней),Путь к PDF,Комментарий\n\
                    Инженер,ИТ,01.03.2024,180,a.pdf,устарело\n";
        let table = parse_table(text).expect("parse");
        assert_eq!(table.headers.len(), 6);
        assert!(check_schema(&table.headers).is_ok());
    }

    #[test]
    fn missing_column_is_a_schema_error_with_lists() {
        let text = "Должность,Дата обновления,Срок актуальности (дней),Путь к PDF\n";
        let table = parse_table(text).expect("parse");
        let err = check_schema(&table.headers).unwrap_err();
        match err {
            DocboardError::Schema { missing, found } => {
                assert_eq!(missing, vec!["Отдел".to_string()]);
                assert_eq!(found.len(), 4);
                assert!(found.contains(&"Должность".to_string()));
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let text = "Должность,Отдел,Дата обновления,Срок актуальности (дней),Путь к PDF\n\
                    Инженер,ИТ,01.03.2024\n";
        let err = parse_table(text).unwrap_err();
        assert!(matches!(err, DocboardError::Parse { .. }));
    }
}
