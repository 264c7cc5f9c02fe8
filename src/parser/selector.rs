//! シート選択
//!
//! ワークシートフィルター文字列から、変換対象のシートを元の順序で選択します。

use crate::types::Sheet;

/// シート選択方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SheetSelector {
    /// すべてのシートを選択（フィルターが空）
    All,

    /// シート名にフィルター文字列を含むシートを選択
    ///
    /// 完全一致ではなく部分一致です。`"Sheet1"`は`"Sheet1"`と`"Sheet10"`の両方に一致します。
    Containing(String),
}

impl SheetSelector {
    /// ワークシートフィルター文字列から選択方式を生成
    pub fn from_filter(filter: &str) -> Self {
        if filter.is_empty() {
            SheetSelector::All
        } else {
            SheetSelector::Containing(filter.to_string())
        }
    }

    /// フィルターが指定されているか
    pub fn is_filtered(&self) -> bool {
        matches!(self, SheetSelector::Containing(_))
    }

    /// シート名が選択対象かどうか
    pub fn matches(&self, sheet_name: &str) -> bool {
        match self {
            SheetSelector::All => true,
            SheetSelector::Containing(filter) => sheet_name.contains(filter.as_str()),
        }
    }

    /// 選択されたシートのインデックスを元の順序で返す
    ///
    /// 一致するシートがなくてもエラーにはならず、空のリストを返します。
    pub fn select(&self, sheets: &[Sheet]) -> Vec<usize> {
        sheets
            .iter()
            .enumerate()
            .filter(|(_, sheet)| self.matches(sheet.name()))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheets(names: &[&str]) -> Vec<Sheet> {
        names.iter().map(|name| Sheet::empty(*name)).collect()
    }

    #[test]
    fn test_empty_filter_selects_all_in_order() {
        let selector = SheetSelector::from_filter("");
        assert_eq!(selector, SheetSelector::All);
        assert!(!selector.is_filtered());
        assert_eq!(selector.select(&sheets(&["B", "A", "C"])), vec![0, 1, 2]);
    }

    // 部分一致の回帰テスト: "Sheet1"は"Sheet10"にも一致する
    #[test]
    fn test_filter_is_substring_match() {
        let selector = SheetSelector::from_filter("Sheet1");
        assert!(selector.is_filtered());
        assert_eq!(
            selector.select(&sheets(&["Sheet1", "Sheet2", "Sheet10"])),
            vec![0, 2]
        );
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let selector = SheetSelector::from_filter("sheet");
        assert!(selector.select(&sheets(&["Sheet1"])).is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let selector = SheetSelector::from_filter("Missing");
        assert!(selector.select(&sheets(&["Sheet1", "Data"])).is_empty());
    }
}
