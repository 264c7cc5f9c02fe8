//! CSV出力

use std::borrow::Cow;

use super::RenderContext;
use crate::cancel::checkpoint;
use crate::error::XlsxConvError;

/// CSVフォーマッター
///
/// 空行も含めてすべての行を1行ずつ出力します。セルは書式適用前の文字列表現をそのまま使用し、
/// 空セルは区切り文字の間の空文字列になります。シートの境界には何も出力しません。
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CsvFormatter;

impl CsvFormatter {
    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, XlsxConvError> {
        let separator = context.options.csv_separator.as_str();
        let quote = context.options.quote_csv_fields;
        let mut output = String::new();

        for sheet in context.sheets() {
            checkpoint(context.signal)?;

            // A1から出力するため、グリッドより左上の領域は空セルになる
            for row_idx in 0..sheet.row_count() {
                checkpoint(context.signal)?;

                for col_idx in 0..sheet.column_count() {
                    checkpoint(context.signal)?;
                    if col_idx > 0 {
                        output.push_str(separator);
                    }

                    let field = sheet
                        .cell(row_idx, col_idx)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    if quote {
                        output.push_str(&escape_csv(&field, separator));
                    } else {
                        output.push_str(&field);
                    }
                }
                output.push('\n');
            }
        }

        Ok(output)
    }
}

/// CSVフィールドのエスケープ（RFC 4180準拠）
///
/// 区切り文字、ダブルクォート、改行を含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは二重化します。
fn escape_csv<'a>(field: &'a str, separator: &str) -> Cow<'a, str> {
    let needs_quoting = field.contains(separator)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');

    if needs_quoting {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
