//! Workbook Parser
//!
//! calamineのラッパーとして、ファイルまたはリーダーからワークブックを開き、
//! 各シートを矩形のグリッドモデルへ変換します。

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::cancel::{checkpoint, CancellationSignal};
use crate::error::XlsxConvError;
use crate::types::{CellValue, Sheet, Workbook};

/// ワークブックパーサー
///
/// 形式（XLSX, XLS, XLSB, ODS）はcalamineが内容から判定します。拡張子は参照しません。
pub(crate) struct WorkbookParser<RS: Read + Seek + Clone> {
    /// calamineのワークブック
    workbook: Sheets<RS>,
    /// ワークブック名（元ファイルのベース名）
    name: String,
}

impl WorkbookParser<Cursor<Vec<u8>>> {
    /// ファイルパスからワークブックを開く
    ///
    /// ファイルは内容をメモリに読み込んだ時点で閉じられます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsxConvError::FileAccess)` - ファイルを開けない、または読めない場合
    /// * `Err(XlsxConvError::UnsupportedFormat)` - スプレッドシートとして認識できない場合
    pub fn open(path: &Path) -> Result<Self, XlsxConvError> {
        let access_error = |source| XlsxConvError::FileAccess {
            path: path.to_path_buf(),
            source,
        };

        let buffer = {
            let mut file = File::open(path).map_err(access_error)?;
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer).map_err(access_error)?;
            buffer
        };
        debug!(path = %path.display(), bytes = buffer.len(), "read workbook file");

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_rs(Cursor::new(buffer), name, path.to_path_buf())
    }

    /// 任意のリーダーからワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - ワークブックの内容
    /// * `name` - 出力に使用するワークブック名
    pub fn from_reader<R: Read>(mut reader: R, name: &str) -> Result<Self, XlsxConvError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_rs(Cursor::new(buffer), name.to_string(), PathBuf::from(name))
    }
}

impl<RS: Read + Seek + Clone> WorkbookParser<RS> {
    fn from_rs(rs: RS, name: String, path: PathBuf) -> Result<Self, XlsxConvError> {
        let workbook = open_workbook_auto_from_rs(rs)
            .map_err(|source| XlsxConvError::UnsupportedFormat { path, source })?;
        Ok(Self { workbook, name })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// ワークブック全体をグリッドモデルへ変換する
    ///
    /// シート・行・セルの各ループでキャンセル要求を確認します。
    pub fn parse_workbook(
        mut self,
        signal: &dyn CancellationSignal,
    ) -> Result<Workbook, XlsxConvError> {
        let names = self.sheet_names();
        let mut sheets = Vec::with_capacity(names.len());

        for name in &names {
            checkpoint(signal)?;
            sheets.push(self.parse_sheet(name, signal)?);
        }

        Ok(Workbook::new(self.name, sheets))
    }

    /// シートをパースしてグリッドへ変換する
    ///
    /// calamineの範囲は最初の使用セルから始まります。グリッドは使用範囲だけを保持し、
    /// その左上セルの位置を記録するため、行番号・列見出しは実際の座標と一致します。
    pub fn parse_sheet(
        &mut self,
        sheet_name: &str,
        signal: &dyn CancellationSignal,
    ) -> Result<Sheet, XlsxConvError> {
        let range = self.workbook.worksheet_range(sheet_name)?;
        let sheet = sheet_from_range(sheet_name, &range, signal)?;
        debug!(
            sheet = sheet_name,
            rows = sheet.row_count(),
            columns = sheet.column_count(),
            stored_rows = sheet.rows().len(),
            "decoded sheet"
        );
        Ok(sheet)
    }
}

/// calamineの使用範囲をグリッドへ変換する
fn sheet_from_range(
    name: &str,
    range: &Range<Data>,
    signal: &dyn CancellationSignal,
) -> Result<Sheet, XlsxConvError> {
    let Some((first_row, first_col)) = range.start() else {
        return Ok(Sheet::empty(name));
    };

    let mut rows = Vec::with_capacity(range.height());
    for cells in range.rows() {
        checkpoint(signal)?;
        let mut row = Vec::with_capacity(cells.len());
        for cell in cells {
            checkpoint(signal)?;
            row.push(convert_data(cell));
        }
        rows.push(row);
    }

    Sheet::with_origin(name, rows, (first_row as usize, first_col as usize))
}

/// calamineのセル値をグリッドモデルのセル値へ変換
fn convert_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// ISO 8601形式の日付・日時文字列（ODS）を解析
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let raw = s.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
