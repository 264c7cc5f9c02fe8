//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::{Deserialize, Serialize};

/// 日付の出力形式
///
/// 日付セルをXML/JSONに変換する際の出力形式を指定します。
/// `Default`以外の形式は、それぞれ固定のロケールで出力します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateFormat {
    /// 変換設定のロケール（`ConversionOptions::locale`）で出力（デフォルト）
    #[default]
    Default,

    /// 日/月/年（フィンランド形式）
    ///
    /// 例: `25/12/2021 0.00.00`
    Ddmmyyyy,

    /// 月/日/年（米国形式）
    ///
    /// 例: `12/25/2021 12:00:00 AM`
    Mmddyyyy,

    /// 年/月/日（日本形式）
    ///
    /// 例: `2021/12/25 0:00:00`
    Yyyymmdd,
}

impl DateFormat {
    /// この形式が固定するロケール
    ///
    /// `Default`の場合は`None`を返し、呼び出し側のロケールが使用されます。
    pub fn pinned_locale(self) -> Option<Locale> {
        match self {
            DateFormat::Default => None,
            DateFormat::Ddmmyyyy => Some(Locale::Finnish),
            DateFormat::Mmddyyyy => Some(Locale::UnitedStates),
            DateFormat::Yyyymmdd => Some(Locale::Japanese),
        }
    }
}

/// 日付の描画に使用するロケール
///
/// プロセス全体のカルチャ設定を参照する代わりに、変換設定として明示的に渡します。
/// これにより出力は実行環境に依存せず決定的になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// ロケール非依存（`MM/DD/YYYY HH:MM:SS`）
    #[default]
    Invariant,

    /// フィンランド（`DD/MM/YYYY H.MM.SS`）
    Finnish,

    /// 米国（`M/D/YYYY h:MM:SS AM`）
    UnitedStates,

    /// 日本（`YYYY/MM/DD H:MM:SS`）
    Japanese,
}

impl Locale {
    /// 日付と時刻を含む書式（chrono互換）
    pub fn long_pattern(self) -> &'static str {
        match self {
            Locale::Invariant => "%m/%d/%Y %H:%M:%S",
            Locale::Finnish => "%d/%m/%Y %-H.%M.%S",
            Locale::UnitedStates => "%-m/%-d/%Y %-I:%M:%S %p",
            Locale::Japanese => "%Y/%m/%d %-H:%M:%S",
        }
    }

    /// 日付のみの書式（chrono互換）
    pub fn short_pattern(self) -> &'static str {
        match self {
            Locale::Invariant => "%m/%d/%Y",
            Locale::Finnish => "%d/%m/%Y",
            Locale::UnitedStates => "%-m/%-d/%Y",
            Locale::Japanese => "%Y/%m/%d",
        }
    }
}

/// 出力フォーマット
///
/// 単一の形式だけが必要な場合に`Converter::convert_to_string`で指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// XML形式
    ///
    /// # 出力例
    ///
    /// ```xml
    /// <workbook workbook_name="f.xlsx"><worksheet worksheet_name="Sheet1"><row row_header="1"><column column_header="A">Foo</column></row></worksheet></workbook>
    /// ```
    Xml,

    /// CSV形式
    ///
    /// 空行も含め、1行につき1ラインを出力します。
    ///
    /// # 出力例
    ///
    /// ```csv
    /// Foo;Bar
    /// 1;2
    /// ```
    Csv,

    /// JSON形式
    ///
    /// # 出力例
    ///
    /// ```json
    /// {"workbook":{"workbook_name":"f.xlsx","worksheets":[{"name":"Sheet1","rows":[{"1":[{"A":"Foo"}]}]}]}}
    /// ```
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_locale() {
        assert_eq!(DateFormat::Default.pinned_locale(), None);
        assert_eq!(DateFormat::Ddmmyyyy.pinned_locale(), Some(Locale::Finnish));
        assert_eq!(
            DateFormat::Mmddyyyy.pinned_locale(),
            Some(Locale::UnitedStates)
        );
        assert_eq!(DateFormat::Yyyymmdd.pinned_locale(), Some(Locale::Japanese));
    }

    #[test]
    fn test_date_format_serde_names() {
        let format: DateFormat = serde_json::from_str("\"DDMMYYYY\"").unwrap();
        assert_eq!(format, DateFormat::Ddmmyyyy);
        assert_eq!(
            serde_json::to_string(&DateFormat::Yyyymmdd).unwrap(),
            "\"YYYYMMDD\""
        );
        assert_eq!(
            serde_json::to_string(&DateFormat::Default).unwrap(),
            "\"DEFAULT\""
        );
    }

    #[test]
    fn test_locale_serde_names() {
        let locale: Locale = serde_json::from_str("\"united_states\"").unwrap();
        assert_eq!(locale, Locale::UnitedStates);
    }
}
