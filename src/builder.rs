//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`はファイルを開いてデコードし、シート選択を行い、
//! 遅延評価される変換結果（`ConversionResult`）を返すオーケストレーターです。

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{DateFormat, Locale, OutputFormat};
use crate::cancel::{CancellationSignal, NeverCancelled};
use crate::error::XlsxConvError;
use crate::parser::WorkbookParser;
use crate::result::{Conversion, ConversionResult};
use crate::types::Workbook;

/// 変換処理の設定
///
/// すべての項目にデフォルト値があり、JSONから読み込む場合は省略した項目にデフォルト値が使われます。
///
/// # 使用例
///
/// ```rust
/// use xlsxconv::ConversionOptions;
///
/// # fn main() -> Result<(), xlsxconv::XlsxConvError> {
/// let options = ConversionOptions::from_json_str(r#"{"csv_separator": ","}"#)?;
/// assert_eq!(options.csv_separator, ",");
/// assert!(options.throw_on_failure);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// ワークシートフィルター（空文字列はすべてのシート、それ以外はシート名への部分一致）
    pub worksheet_filter: String,

    /// CSVの区切り文字列（複数文字も可）
    pub csv_separator: String,

    /// 列見出しを1始まりの数値で出力するか（falseの場合はA, B, ..., AA形式）
    pub use_numeric_column_headers: bool,

    /// 失敗時にエラーを返すか（falseの場合は`ConversionResult::Failure`を返す）
    pub throw_on_failure: bool,

    /// 日付形式
    pub date_format: DateFormat,

    /// 日付のみ（時刻なし）の短い形式で出力するか
    pub short_date_pattern: bool,

    /// `DateFormat::Default`で使用するロケール
    pub locale: Locale,

    /// CSVフィールドを必要に応じてダブルクォートで囲むか
    pub quote_csv_fields: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            worksheet_filter: String::new(),
            csv_separator: ";".to_string(),
            use_numeric_column_headers: false,
            throw_on_failure: true,
            date_format: DateFormat::Default,
            short_date_pattern: false,
            locale: Locale::Invariant,
            quote_csv_fields: false,
        }
    }
}

impl ConversionOptions {
    /// JSON文字列から設定を読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionOptions)` - 読み込みに成功した場合（未検証）
    /// * `Err(XlsxConvError::Config)` - JSONとして不正、または値の型が一致しない場合
    pub fn from_json_str(json: &str) -> Result<Self, XlsxConvError> {
        serde_json::from_str(json)
            .map_err(|e| XlsxConvError::Config(format!("Invalid conversion options: {}", e)))
    }

    /// 設定を検証する
    pub(crate) fn validate(&self) -> Result<(), XlsxConvError> {
        // 1. CSV区切り文字の検証
        if self.csv_separator.is_empty() {
            return Err(XlsxConvError::Config(
                "CSV separator must not be empty".to_string(),
            ));
        }

        if self.csv_separator.contains(['\n', '\r']) {
            return Err(XlsxConvError::Config(format!(
                "CSV separator must not contain a line break: {:?}",
                self.csv_separator
            )));
        }

        Ok(())
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxconv::{ConverterBuilder, DateFormat};
///
/// # fn main() -> Result<(), xlsxconv::XlsxConvError> {
/// let converter = ConverterBuilder::new()
///     .with_worksheet_filter("Sheet1")
///     .with_csv_separator(",")
///     .with_date_format(DateFormat::Yyyymmdd)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    options: ConversionOptions,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - ワークシートフィルター: なし（すべてのシート）
    /// - CSV区切り文字: `;`
    /// - 列見出し: 英字（A, B, ..., AA）
    /// - 失敗時: エラーを返す
    /// - 日付形式: `DateFormat::Default`（インバリアントロケール、長い形式）
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の設定からビルダーを生成する
    ///
    /// 設定ファイルから読み込んだ`ConversionOptions`を使う場合に利用します。
    /// 検証は`build()`時に行われます。
    pub fn from_options(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// 変換対象のシートをシート名の部分一致で絞り込む
    ///
    /// 空文字列はすべてのシートを選択します。大文字・小文字は区別されます。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxconv::ConverterBuilder;
    ///
    /// // "Sheet1"と"Sheet10"の両方に一致する
    /// let builder = ConverterBuilder::new().with_worksheet_filter("Sheet1");
    /// ```
    pub fn with_worksheet_filter(mut self, filter: impl Into<String>) -> Self {
        self.options.worksheet_filter = filter.into();
        self
    }

    /// CSVの区切り文字列を指定する
    ///
    /// # 制約
    ///
    /// * 空文字列、または改行を含む文字列は`build()`時に`XlsxConvError::Config`になる
    pub fn with_csv_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.csv_separator = separator.into();
        self
    }

    /// 列見出しを数値で出力するかを指定する
    ///
    /// # 引数
    ///
    /// * `enabled: bool`:
    ///   * `true`: 1, 2, 3, ...
    ///   * `false`: A, B, C, ...（デフォルト）
    pub fn use_numeric_column_headers(mut self, enabled: bool) -> Self {
        self.options.use_numeric_column_headers = enabled;
        self
    }

    /// 失敗時の動作を指定する
    ///
    /// `false`の場合、ファイルアクセスやデコードの失敗は`ConversionResult::Failure`として返されます。
    /// キャンセルはこの設定に関わらず常にエラーとして返されます。
    pub fn throw_on_failure(mut self, enabled: bool) -> Self {
        self.options.throw_on_failure = enabled;
        self
    }

    /// 日付の出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, DateFormat};
    ///
    /// // 25/12/2021 0.00.00
    /// let builder = ConverterBuilder::new().with_date_format(DateFormat::Ddmmyyyy);
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.options.date_format = format;
        self
    }

    /// 日付を短い形式（時刻なし）で出力するかを指定する
    pub fn short_date_pattern(mut self, enabled: bool) -> Self {
        self.options.short_date_pattern = enabled;
        self
    }

    /// `DateFormat::Default`で使用するロケールを指定する
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.options.locale = locale;
        self
    }

    /// CSVフィールドのクォートを有効にする
    ///
    /// 有効な場合、区切り文字・ダブルクォート・改行を含むフィールドをダブルクォートで囲みます。
    pub fn quote_csv_fields(mut self, enabled: bool) -> Self {
        self.options.quote_csv_fields = enabled;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合、Converterインスタンス
    /// * `Err(XlsxConvError::Config)`: 設定が無効な場合（例: 空のCSV区切り文字）
    pub fn build(self) -> Result<Converter, XlsxConvError> {
        self.options.validate()?;
        Ok(Converter::new(self.options))
    }
}

/// 変換処理のファサード
///
/// スプレッドシートをXML/CSV/JSONへ変換するためのメインエントリーポイントです。
/// 1回の変換呼び出しごとに`ConversionResult`を生成し、各出力は最初のアクセス時に一度だけ計算されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxconv::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxconv::XlsxConvError> {
/// let converter = ConverterBuilder::new().with_csv_separator(",").build()?;
/// let result = converter.convert("report.xlsx")?;
///
/// if let Some(conversion) = result.conversion() {
///     println!("{}", conversion.to_csv()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    options: ConversionOptions,
}

impl Converter {
    pub(crate) fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// 変換設定を取得
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// ファイルを変換する
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionResult::Success)` - デコードとシート選択に成功した場合
    /// * `Ok(ConversionResult::Failure)` - 失敗したが`throw_on_failure`が`false`の場合
    /// * `Err(XlsxConvError)` - 失敗し、`throw_on_failure`が`true`の場合
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<ConversionResult, XlsxConvError> {
        self.convert_with_cancellation(path, Arc::new(NeverCancelled))
    }

    /// キャンセル信号を指定してファイルを変換する
    ///
    /// 信号は結果の各出力の計算時にも参照されます。
    ///
    /// # 処理フロー
    ///
    /// 1. ファイルを読み込み、形式を判定
    /// 2. 各シートをグリッドモデルへデコード（シート・行・セルごとにキャンセル確認）
    /// 3. シート選択を行い、遅延評価される結果を生成
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use xlsxconv::{CancellationToken, ConverterBuilder, XlsxConvError};
    ///
    /// # fn main() -> Result<(), XlsxConvError> {
    /// let token = CancellationToken::new();
    /// let converter = ConverterBuilder::new().build()?;
    ///
    /// token.cancel();
    /// let result = converter.convert_with_cancellation("report.xlsx", Arc::new(token.clone()));
    /// assert!(matches!(result, Err(XlsxConvError::Cancelled)));
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_with_cancellation<P: AsRef<Path>>(
        &self,
        path: P,
        signal: Arc<dyn CancellationSignal>,
    ) -> Result<ConversionResult, XlsxConvError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening workbook");

        let decoded = WorkbookParser::open(path)
            .and_then(|parser| parser.parse_workbook(signal.as_ref()));
        self.finish(decoded, signal)
    }

    /// 任意のリーダーから読み込んで変換する
    ///
    /// # 引数
    ///
    /// * `reader` - ワークブックの内容
    /// * `workbook_name` - 出力の`workbook_name`に使用する名前
    pub fn convert_reader<R: Read>(
        &self,
        reader: R,
        workbook_name: &str,
    ) -> Result<ConversionResult, XlsxConvError> {
        let signal: Arc<dyn CancellationSignal> = Arc::new(NeverCancelled);
        let decoded = WorkbookParser::from_reader(reader, workbook_name)
            .and_then(|parser| parser.parse_workbook(signal.as_ref()));
        self.finish(decoded, signal)
    }

    /// デコード済みのグリッドモデルを変換する
    ///
    /// デコードを伴わないため失敗しません。
    pub fn convert_workbook(&self, workbook: Workbook) -> ConversionResult {
        self.convert_workbook_with_cancellation(workbook, Arc::new(NeverCancelled))
    }

    /// キャンセル信号を指定してグリッドモデルを変換する
    ///
    /// キャンセルは各出力の計算時に確認されます。
    pub fn convert_workbook_with_cancellation(
        &self,
        workbook: Workbook,
        signal: Arc<dyn CancellationSignal>,
    ) -> ConversionResult {
        ConversionResult::Success(self.conversion(workbook, signal))
    }

    /// ファイルを変換し、指定したフォーマットの文字列を直接返す
    ///
    /// `throw_on_failure`の設定に関わらず、失敗はすべてエラーとして返されます。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, OutputFormat};
    ///
    /// # fn main() -> Result<(), xlsxconv::XlsxConvError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let xml = converter.convert_to_string("report.xlsx", OutputFormat::Xml)?;
    /// println!("{}", xml);
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_to_string<P: AsRef<Path>>(
        &self,
        path: P,
        format: OutputFormat,
    ) -> Result<String, XlsxConvError> {
        let path = path.as_ref();
        let signal: Arc<dyn CancellationSignal> = Arc::new(NeverCancelled);
        let workbook = WorkbookParser::open(path)?.parse_workbook(signal.as_ref())?;
        let conversion = self.conversion(workbook, signal);
        conversion.render(format).map(str::to_string)
    }

    fn conversion(&self, workbook: Workbook, signal: Arc<dyn CancellationSignal>) -> Conversion {
        let conversion = Conversion::new(workbook, self.options.clone(), signal);
        info!(
            workbook = conversion.workbook().name(),
            sheets = conversion.workbook().sheets().len(),
            selected = conversion.selected_count(),
            "conversion ready"
        );
        conversion
    }

    /// デコード結果を失敗時の動作設定に従って結果へ変換する
    fn finish(
        &self,
        decoded: Result<Workbook, XlsxConvError>,
        signal: Arc<dyn CancellationSignal>,
    ) -> Result<ConversionResult, XlsxConvError> {
        match decoded {
            Ok(workbook) => Ok(ConversionResult::Success(self.conversion(workbook, signal))),
            Err(XlsxConvError::Cancelled) => Err(XlsxConvError::Cancelled),
            Err(e) if self.options.throw_on_failure => Err(e),
            Err(e) => {
                let message = e.full_description();
                warn!(error = %message, "conversion failed");
                Ok(ConversionResult::Failure { message })
            }
        }
    }
}
