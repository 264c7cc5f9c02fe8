//! XML出力
//!
//! `workbook > worksheet > row > column`の入れ子構造で出力します。XML宣言は出力しません。

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::RenderContext;
use crate::cancel::checkpoint;
use crate::error::XlsxConvError;

/// XMLフォーマッター
///
/// 空セル・空白セルは`column`要素を出力せず、存在するセルが1つもない行は`row`要素ごと省略します。
/// シートに出力対象の行がなくても`worksheet`要素は出力します。
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct XmlFormatter;

impl XmlFormatter {
    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, XlsxConvError> {
        let mut writer = Writer::new(Vec::new());

        let workbook_name = context.workbook.name();
        ensure_xml_chars(workbook_name, || "workbook name".to_string())?;
        let mut root = BytesStart::new("workbook");
        root.push_attribute(("workbook_name", workbook_name));
        writer.write_event(Event::Start(root))?;

        for sheet in context.sheets() {
            checkpoint(context.signal)?;

            ensure_xml_chars(sheet.name(), || format!("name of sheet {:?}", sheet.name()))?;
            let mut worksheet = BytesStart::new("worksheet");
            worksheet.push_attribute(("worksheet_name", sheet.name()));
            writer.write_event(Event::Start(worksheet))?;

            for (offset, row) in sheet.rows().iter().enumerate() {
                checkpoint(context.signal)?;
                let row_idx = sheet.row_offset() + offset;
                let mut row_open = false;

                for (col_offset, value) in row.iter().enumerate() {
                    checkpoint(context.signal)?;
                    let col_idx = sheet.column_offset() + col_offset;
                    let Some(content) = context.formatter.format_cell(value, context.options)
                    else {
                        continue;
                    };
                    let header = context.formatter.column_header(col_idx, context.options);
                    ensure_xml_chars(&content, || {
                        format!("cell {}{} of sheet {:?}", header, row_idx + 1, sheet.name())
                    })?;

                    // 最初の非空セルで行要素を開く
                    if !row_open {
                        let row_header = (row_idx + 1).to_string();
                        let mut row_start = BytesStart::new("row");
                        row_start.push_attribute(("row_header", row_header.as_str()));
                        writer.write_event(Event::Start(row_start))?;
                        row_open = true;
                    }

                    let mut column = BytesStart::new("column");
                    column.push_attribute(("column_header", header.as_str()));
                    writer.write_event(Event::Start(column))?;
                    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                        &content,
                    ))))?;
                    writer.write_event(Event::End(BytesEnd::new("column")))?;
                }

                if row_open {
                    writer.write_event(Event::End(BytesEnd::new("row")))?;
                }
            }

            writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("workbook")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }
}

/// XML 1.0の`Char`に含まれる文字か
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// エスケープでは表現できない文字がないことを確認する
///
/// `location`はエラー時にのみ評価されます。
fn ensure_xml_chars(
    value: &str,
    location: impl FnOnce() -> String,
) -> Result<(), XlsxConvError> {
    match value.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(XlsxConvError::InvalidXmlCharacter {
            location: location(),
            code: u32::from(c),
        }),
        None => Ok(()),
    }
}
