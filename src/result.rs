//! Conversion Result Module
//!
//! 変換結果を表す型を定義するモジュール。
//! XML/CSV/JSONの各出力は最初のアクセス時に計算され、結果インスタンスごとに一度だけ保持されます。

use std::fmt;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::api::OutputFormat;
use crate::builder::ConversionOptions;
use crate::cancel::CancellationSignal;
use crate::error::XlsxConvError;
use crate::formatter::CellFormatter;
use crate::output::{JsonFormatter, OutputFormatter, RenderContext};
use crate::parser::SheetSelector;
use crate::types::{Sheet, Workbook};

/// 変換結果
///
/// 成功時は遅延評価される出力を持つ`Conversion`を、失敗時（`throw_on_failure`が`false`の場合のみ）は
/// エラーの説明文を保持します。失敗時に部分的なデータは保持しません。
#[derive(Debug)]
pub enum ConversionResult {
    /// 変換成功
    Success(Conversion),

    /// 変換失敗
    Failure {
        /// エラーの説明（原因の連鎖を含む）
        message: String,
    },
}

impl ConversionResult {
    /// 成功したかどうか
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success(_))
    }

    /// 失敗時のエラーメッセージ
    pub fn message(&self) -> Option<&str> {
        match self {
            ConversionResult::Success(_) => None,
            ConversionResult::Failure { message } => Some(message),
        }
    }

    /// デコード済みのグリッドモデル（失敗時は`None`）
    pub fn data(&self) -> Option<&Workbook> {
        self.conversion().map(Conversion::workbook)
    }

    pub fn conversion(&self) -> Option<&Conversion> {
        match self {
            ConversionResult::Success(conversion) => Some(conversion),
            ConversionResult::Failure { .. } => None,
        }
    }

    pub fn into_conversion(self) -> Option<Conversion> {
        match self {
            ConversionResult::Success(conversion) => Some(conversion),
            ConversionResult::Failure { .. } => None,
        }
    }
}

/// 成功した変換
///
/// グリッドモデル、設定、選択されたシートを保持し、各出力をメモ化します。
/// 計算中にキャンセルされた場合はエラーを返し、その出力はキャッシュされません。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxconv::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxconv::XlsxConvError> {
/// let converter = ConverterBuilder::new().build()?;
/// if let Some(conversion) = converter.convert("report.xlsx")?.into_conversion() {
///     let xml = conversion.to_xml()?;
///     let json = conversion.to_json()?;
///     println!("{}\n{}", xml, json);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Conversion {
    workbook: Workbook,
    options: ConversionOptions,
    /// 選択されたシートのインデックス（元の順序）
    selected: Vec<usize>,
    filtered: bool,
    signal: Arc<dyn CancellationSignal>,

    xml: OnceCell<String>,
    csv: OnceCell<String>,
    json: OnceCell<String>,
    json_value: OnceCell<serde_json::Value>,
}

impl Conversion {
    pub(crate) fn new(
        workbook: Workbook,
        options: ConversionOptions,
        signal: Arc<dyn CancellationSignal>,
    ) -> Self {
        let selector = SheetSelector::from_filter(&options.worksheet_filter);
        let selected = selector.select(workbook.sheets());

        Self {
            workbook,
            options,
            selected,
            filtered: selector.is_filtered(),
            signal,
            xml: OnceCell::new(),
            csv: OnceCell::new(),
            json: OnceCell::new(),
            json_value: OnceCell::new(),
        }
    }

    /// デコード済みのグリッドモデル（選択前のすべてのシート）
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// 選択されたシートを元の順序で返す
    pub fn selected_sheets(&self) -> impl Iterator<Item = &Sheet> + '_ {
        let sheets = self.workbook.sheets();
        self.selected.iter().filter_map(move |&index| sheets.get(index))
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// XML出力（初回のみ計算）
    pub fn to_xml(&self) -> Result<&str, XlsxConvError> {
        self.memoized(&self.xml, OutputFormatter::Xml)
    }

    /// CSV出力（初回のみ計算）
    pub fn to_csv(&self) -> Result<&str, XlsxConvError> {
        self.memoized(&self.csv, OutputFormatter::Csv)
    }

    /// JSON出力（初回のみ計算、コンパクト形式）
    pub fn to_json(&self) -> Result<&str, XlsxConvError> {
        self.memoized(&self.json, OutputFormatter::Json)
    }

    /// JSON出力を`serde_json::Value`として取得（初回のみ計算）
    pub fn to_json_value(&self) -> Result<&serde_json::Value, XlsxConvError> {
        self.json_value.get_or_try_init(|| {
            debug!(format = "json_value", "rendering conversion");
            JsonFormatter.render_value(&self.context())
        })
    }

    /// 指定したフォーマットの出力を取得
    pub fn render(&self, format: OutputFormat) -> Result<&str, XlsxConvError> {
        match format {
            OutputFormat::Xml => self.to_xml(),
            OutputFormat::Csv => self.to_csv(),
            OutputFormat::Json => self.to_json(),
        }
    }

    fn memoized<'a>(
        &'a self,
        cell: &'a OnceCell<String>,
        formatter: OutputFormatter,
    ) -> Result<&'a str, XlsxConvError> {
        cell.get_or_try_init(|| {
            debug!(format = ?formatter, "rendering conversion");
            formatter.render(&self.context())
        })
        .map(String::as_str)
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            workbook: &self.workbook,
            selected: &self.selected,
            filtered: self.filtered,
            options: &self.options,
            signal: self.signal.as_ref(),
            formatter: CellFormatter::new(),
        }
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("workbook", &self.workbook.name())
            .field("selected", &self.selected)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
