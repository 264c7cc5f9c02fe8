//! Formatter Module
//!
//! セル値と列見出しの描画処理を提供するモジュール。
//! 空セルおよび空白のみのセルは「存在しない」ものとして`None`を返し、
//! XML/JSONシリアライザはそれらを出力から除外します。

use chrono::NaiveDateTime;

use crate::builder::ConversionOptions;
use crate::types::CellValue;

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self {
            date_formatter: DateFormatter,
        }
    }

    /// セル値を表示用文字列に変換
    ///
    /// # 引数
    ///
    /// * `value` - セル値
    /// * `options` - 変換設定（日付形式、ロケール）
    ///
    /// # 戻り値
    ///
    /// * `Some(String)` - 描画結果
    /// * `None` - 空セル、または空白のみの文字列（出力から除外される）
    pub fn format_cell(&self, value: &CellValue, options: &ConversionOptions) -> Option<String> {
        let rendered = match value {
            CellValue::DateTime(dt) => self.date_formatter.format(dt, options),
            other => other.to_string(),
        };

        if rendered.trim().is_empty() {
            None
        } else {
            Some(rendered)
        }
    }

    /// 列見出しを生成（0始まりの列インデックス）
    ///
    /// `use_numeric_column_headers`が有効な場合は`index + 1`の10進表記、
    /// そうでなければスプレッドシート形式の英字表記（A, B, ..., Z, AA, ...）を返します。
    pub fn column_header(&self, index: usize, options: &ConversionOptions) -> String {
        let number = index as u64 + 1;
        if options.use_numeric_column_headers {
            number.to_string()
        } else {
            column_letters(number)
        }
    }
}

/// 1始まりの列番号を英字表記に変換（1 -> "A", 26 -> "Z", 27 -> "AA"）
///
/// 全単射26進法: `(n - 1) mod 26`で末尾の文字を決め、`n = (n - mod) / 26`として
/// `n`が0になるまで繰り返します。`0`には空文字列を返します。
pub fn column_letters(number: u64) -> String {
    let mut letters = Vec::new();
    let mut n = number;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - rem) / 26;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// 日付フォーマッター
///
/// `DateFormat`とロケールに従って日付時刻を文字列に変換します。
#[derive(Debug, Default)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 日付時刻をフォーマット
    ///
    /// `DateFormat::Default`は`options.locale`を、それ以外は形式ごとに固定のロケールを使用します。
    /// `short_date_pattern`が有効な場合は時刻部分を出力しません。
    pub fn format(&self, value: &NaiveDateTime, options: &ConversionOptions) -> String {
        let locale = options
            .date_format
            .pinned_locale()
            .unwrap_or(options.locale);

        let pattern = if options.short_date_pattern {
            locale.short_pattern()
        } else {
            locale.long_pattern()
        };

        value.format(pattern).to_string()
    }
}
