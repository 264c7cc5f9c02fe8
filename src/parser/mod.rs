//! Parser Module
//!
//! calamineを使用したワークブックのデコードと、変換対象シートの選択を提供するモジュール。
//! デコード結果はメモリ内のグリッドモデル（`Workbook`）として保持されます。

mod selector;
mod workbook;

pub(crate) use selector::SheetSelector;
pub(crate) use workbook::WorkbookParser;
