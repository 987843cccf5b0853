//! Spreadsheet output of the extracted article records.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── result_20250506143000.xlsx   # one per run, sheet "Result"
//! ├── <thumbnail>.jpg
//! └── ...
//! ```
//!
//! The workbook holds a single worksheet: a header row with the
//! [`ArticleInfo`] field names, then one row per record in run order.

use crate::models::ArticleInfo;
use crate::utils::result_file_name;
use anyhow::Context;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Name of the only worksheet of the result workbook.
pub const SHEET_NAME: &str = "Result";

/// Lay out `infos` in a new workbook.
pub fn build_workbook(infos: &[ArticleInfo]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in ArticleInfo::HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (i, info) in infos.iter().enumerate() {
        let row = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        sheet.write_string(row, 0, &info.title)?;
        sheet.write_string(row, 1, &info.date)?;
        sheet.write_string(row, 2, &info.description)?;
        sheet.write_string(row, 3, &info.picture_file_name)?;
        sheet.write_number(row, 4, info.count_keyword as f64)?;
        sheet.write_boolean(row, 5, info.contain_money)?;
    }

    Ok(workbook)
}

/// Write `infos` to `<output_dir>/result_<timestamp>.xlsx`.
///
/// # Returns
///
/// The path of the written workbook.
#[instrument(level = "info", skip_all, fields(records = infos.len(), output_dir = %output_dir.display()))]
pub async fn write_result_file(
    infos: &[ArticleInfo],
    output_dir: &Path,
    now: NaiveDateTime,
) -> anyhow::Result<PathBuf> {
    let path = output_dir.join(result_file_name(now));

    let mut workbook = build_workbook(infos).context("laying out result workbook")?;
    let buf = workbook
        .save_to_buffer()
        .context("encoding result workbook")?;

    fs::write(&path, &buf)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = buf.len(), "Wrote result spreadsheet");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Range, Reader, Xlsx, open_workbook};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn info(title: &str) -> ArticleInfo {
        ArticleInfo {
            title: title.to_string(),
            date: "2025-05-06T09:00:00Z".to_string(),
            description: "Oil rose $3 a barrel".to_string(),
            picture_file_name: "oil.jpg".to_string(),
            count_keyword: 1,
            contain_money: true,
        }
    }

    fn read_back(path: &Path) -> (Vec<String>, Range<Data>) {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range)
    }

    #[test]
    fn test_build_workbook_single_sheet() {
        let mut workbook = build_workbook(&[info("a"), info("b")]).unwrap();

        assert_eq!(workbook.worksheet_from_index(0).unwrap().name(), SHEET_NAME);
        assert!(workbook.worksheet_from_index(1).is_err());
    }

    #[tokio::test]
    async fn test_write_result_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_result_file(&[info("Oil jumps")], dir.path(), now())
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("result_20250506143000.xlsx"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_write_result_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let infos = vec![
            info("Oil jumps"),
            ArticleInfo {
                title: "Markets calm".to_string(),
                date: "2025-05-05T08:00:00Z".to_string(),
                description: "Quiet session".to_string(),
                picture_file_name: "ERROR".to_string(),
                count_keyword: 3,
                contain_money: false,
            },
        ];
        let path = write_result_file(&infos, dir.path(), now()).await.unwrap();

        let (names, range) = read_back(&path);
        assert_eq!(names, vec![SHEET_NAME.to_string()]);
        assert_eq!(range.height(), infos.len() + 1);
        assert_eq!(range.width(), ArticleInfo::HEADERS.len());

        let rows: Vec<&[Data]> = range.rows().collect();
        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, ArticleInfo::HEADERS);

        for (info, row) in infos.iter().zip(&rows[1..]) {
            assert_eq!(row[0], Data::String(info.title.clone()));
            assert_eq!(row[1], Data::String(info.date.clone()));
            assert_eq!(row[2], Data::String(info.description.clone()));
            assert_eq!(row[3], Data::String(info.picture_file_name.clone()));
            assert_eq!(row[4], Data::Float(info.count_keyword as f64));
            assert_eq!(row[5], Data::Bool(info.contain_money));
        }
    }

    #[tokio::test]
    async fn test_write_result_file_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_result_file(&[], dir.path(), now()).await.unwrap();

        let (_, range) = read_back(&path);
        assert_eq!(range.height(), 1);
        let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, ArticleInfo::HEADERS);
    }

    #[tokio::test]
    async fn test_write_result_file_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = write_result_file(&[info("a")], &missing, now())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("writing"));
    }
}
