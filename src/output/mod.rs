//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。
//! 3つのシリアライザは互いに独立しており、シート選択結果とセルフォーマッターを共有します。

mod csv;
mod json;
mod xml;

use crate::api::OutputFormat;
use crate::builder::ConversionOptions;
use crate::cancel::CancellationSignal;
use crate::error::XlsxConvError;
use crate::formatter::CellFormatter;
use crate::types::{Sheet, Workbook};

pub(crate) use csv::CsvFormatter;
pub(crate) use json::JsonFormatter;
pub(crate) use xml::XmlFormatter;

/// シリアライズに必要な入力一式
///
/// グリッドモデル、選択済みシートのインデックス、変換設定、キャンセル信号を束ねます。
pub(crate) struct RenderContext<'a> {
    pub workbook: &'a Workbook,
    /// 選択されたシートのインデックス（元の順序）
    pub selected: &'a [usize],
    /// ワークシートフィルターが指定されているか（JSONのキー名に影響）
    pub filtered: bool,
    pub options: &'a ConversionOptions,
    pub signal: &'a dyn CancellationSignal,
    pub formatter: CellFormatter,
}

impl<'a> RenderContext<'a> {
    /// 選択されたシートを元の順序で返す
    pub fn sheets(&self) -> impl Iterator<Item = &'a Sheet> + '_ {
        let sheets = self.workbook.sheets();
        self.selected.iter().filter_map(move |&index| sheets.get(index))
    }
}

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（XML, CSV, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Xml,
    Csv,
    Json,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xml => OutputFormatter::Xml,
            OutputFormat::Csv => OutputFormatter::Csv,
            OutputFormat::Json => OutputFormatter::Json,
        }
    }

    /// 選択されたシートを指定されたフォーマットで文字列に変換する
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 出力に成功した場合
    /// * `Err(XlsxConvError::Cancelled)` - 途中でキャンセルが要求された場合
    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, XlsxConvError> {
        match self {
            OutputFormatter::Xml => XmlFormatter.render(context),
            OutputFormatter::Csv => CsvFormatter.render(context),
            OutputFormatter::Json => JsonFormatter.render(context),
        }
    }
}
