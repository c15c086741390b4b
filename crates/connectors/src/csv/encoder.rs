use crate::error::EncodeError;
use model::records::page::Page;
use tracing::warn;

/// Delimited-text form of one page, ready for upload.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    pub bytes: Vec<u8>,
    /// Header row plus one row per record.
    pub rows: usize,
    /// Records whose keys did not match the header and were written positionally.
    pub drifted: usize,
}

impl PageArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encodes a page as CSV. Returns `None` for an empty page.
///
/// The header is the first record's key order. Every record is written as
/// its values in its own key order, so a record with a different key set
/// lands in the header's columns by position.
pub fn encode_page(page: &Page) -> Result<Option<PageArtifact>, EncodeError> {
    if page.is_empty() {
        return Ok(None);
    }

    let header = page.header();
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&header)?;

    let mut drifted = 0;
    for (idx, record) in page.records.iter().enumerate() {
        if !record.matches_header(&header) {
            drifted += 1;
            warn!(
                offset = page.offset(),
                row = idx,
                fields = record.len(),
                columns = header.len(),
                "Record keys differ from header; writing positionally."
            );
        }
        writer.write_record(record.values().map(|v| v.to_cell()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EncodeError::Flush(e.to_string()))?;

    Ok(Some(PageArtifact {
        bytes,
        rows: page.len() + 1,
        drifted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::records::{
        page::{Page, PageWindow},
        record::Record,
    };
    use serde_json::json;

    fn page(values: Vec<serde_json::Value>) -> Page {
        let records = values
            .into_iter()
            .map(|v| Record::from_json(v).unwrap())
            .collect();
        Page::new(PageWindow::first(10), records)
    }

    fn text(artifact: &PageArtifact) -> String {
        String::from_utf8(artifact.bytes.clone()).unwrap()
    }

    #[test]
    fn test_empty_page_produces_nothing() {
        assert!(encode_page(&page(vec![])).unwrap().is_none());
    }

    #[test]
    fn test_header_and_rows() {
        let artifact = encode_page(&page(vec![
            json!({"unique_key": "1", "agency": "NYPD", "closed": null}),
            json!({"unique_key": "2", "agency": "DOT, Queens", "closed": "x"}),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(artifact.rows, 3);
        assert_eq!(artifact.drifted, 0);
        assert_eq!(
            text(&artifact),
            "unique_key,agency,closed\n1,NYPD,\n2,\"DOT, Queens\",x\n"
        );
    }

    #[test]
    fn test_row_count_is_records_plus_header() {
        let artifact = encode_page(&page(vec![json!({"a": 1}); 5])).unwrap().unwrap();
        assert_eq!(artifact.rows, 6);
        assert_eq!(text(&artifact).lines().count(), 6);
    }

    #[test]
    fn test_numeric_cells_keep_response_text() {
        let records = crate::http::fetcher::decode_records(
            br#"[{"lat": 40.70, "n": 1.0, "big": 12345678901234567890123}]"#,
            &[],
        )
        .unwrap();
        let artifact = encode_page(&Page::new(PageWindow::first(10), records))
            .unwrap()
            .unwrap();

        assert_eq!(
            text(&artifact),
            "lat,n,big\n40.70,1.0,12345678901234567890123\n"
        );
    }

    #[test]
    fn test_drifting_records_written_positionally() {
        let artifact = encode_page(&page(vec![
            json!({"a": "1", "b": "2"}),
            json!({"b": "3", "a": "4"}),
            json!({"a": "5"}),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(artifact.drifted, 2);
        assert_eq!(text(&artifact), "a,b\n1,2\n3,4\n5\n");
    }
}
