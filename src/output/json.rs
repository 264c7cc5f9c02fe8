//! JSON出力
//!
//! `{"workbook": {"workbook_name": ..., "worksheets": [...]}}`形式で出力します。
//! セル値はすべて文字列として埋め込みます。

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::RenderContext;
use crate::cancel::checkpoint;
use crate::error::XlsxConvError;
use crate::types::Sheet;

/// JSONフォーマッター
///
/// フィルター指定時に選択されたシートがちょうど1つであれば`"worksheet"`キーに単一のオブジェクトを、
/// それ以外は`"worksheets"`キーに配列を出力します。
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct JsonFormatter;

impl JsonFormatter {
    /// コンパクトなJSON文字列として出力
    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, XlsxConvError> {
        let document = self.document(context)?;
        Ok(serde_json::to_string(&document)?)
    }

    /// `serde_json::Value`として出力
    pub fn render_value(
        &self,
        context: &RenderContext<'_>,
    ) -> Result<serde_json::Value, XlsxConvError> {
        let document = self.document(context)?;
        Ok(serde_json::to_value(&document)?)
    }

    fn document<'a>(
        &self,
        context: &RenderContext<'a>,
    ) -> Result<JsonDocument<'a>, XlsxConvError> {
        let mut sheets = Vec::with_capacity(context.selected.len());
        for sheet in context.sheets() {
            checkpoint(context.signal)?;
            sheets.push(self.sheet(sheet, context)?);
        }

        let sheets = if context.filtered && sheets.len() == 1 {
            JsonSheets::Single(sheets.remove(0))
        } else {
            JsonSheets::Many(sheets)
        };

        Ok(JsonDocument {
            workbook: JsonWorkbook {
                workbook_name: context.workbook.name(),
                sheets,
            },
        })
    }

    fn sheet<'a>(
        &self,
        sheet: &'a Sheet,
        context: &RenderContext<'_>,
    ) -> Result<JsonSheet<'a>, XlsxConvError> {
        let mut rows = Vec::new();

        for (offset, row) in sheet.rows().iter().enumerate() {
            checkpoint(context.signal)?;
            let row_idx = sheet.row_offset() + offset;
            let mut columns = Vec::new();

            for (col_offset, value) in row.iter().enumerate() {
                checkpoint(context.signal)?;
                let col_idx = sheet.column_offset() + col_offset;
                if let Some(content) = context.formatter.format_cell(value, context.options) {
                    columns.push(JsonEntry {
                        key: context.formatter.column_header(col_idx, context.options),
                        value: content,
                    });
                }
            }

            if !columns.is_empty() {
                rows.push(JsonEntry {
                    key: (row_idx + 1).to_string(),
                    value: columns,
                });
            }
        }

        Ok(JsonSheet {
            name: sheet.name(),
            rows,
        })
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    workbook: JsonWorkbook<'a>,
}

#[derive(Serialize)]
struct JsonWorkbook<'a> {
    workbook_name: &'a str,
    #[serde(flatten)]
    sheets: JsonSheets<'a>,
}

#[derive(Serialize)]
enum JsonSheets<'a> {
    #[serde(rename = "worksheet")]
    Single(JsonSheet<'a>),
    #[serde(rename = "worksheets")]
    Many(Vec<JsonSheet<'a>>),
}

#[derive(Serialize)]
struct JsonSheet<'a> {
    name: &'a str,
    rows: Vec<JsonEntry<Vec<JsonEntry<String>>>>,
}

/// キーが動的な単一エントリのオブジェクト（`{"1": [...]}`, `{"A": "Foo"}`）
struct JsonEntry<V> {
    key: String,
    value: V,
}

impl<V: Serialize> Serialize for JsonEntry<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}
