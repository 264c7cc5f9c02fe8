//! Types Module
//!
//! デコード済みワークブックのメモリ内表現（グリッドモデル）を定義するモジュール。
//! 変換処理はこのモデルを読み取り専用で扱います。

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::XlsxConvError;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空セル
    Empty,

    /// 文字列
    String(String),

    /// 数値（f64）
    ///
    /// 表示は`f64`の`Display`に従い、指数表記を使いません（`1e21`は`1000000000000000000000`）。
    Number(f64),

    /// 整数
    Integer(i64),

    /// 論理値
    Bool(bool),

    /// 日付時刻
    DateTime(NaiveDateTime),

    /// エラー値（例: #DIV/0!）
    Error(String),
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 空、または空白のみの文字列かどうか
    ///
    /// すべてのシリアライザはこの判定に一致するセルを「存在しない」ものとして扱います。
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// 書式適用前の文字列表現
///
/// CSV出力はこの表現をそのまま使用します。日付は`YYYY-MM-DD HH:MM:SS`。
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

/// 空白領域のセル
static EMPTY_CELL: CellValue = CellValue::Empty;

/// ワークシート
///
/// 名前と、行（外側）×列（内側）の矩形グリッドを持ちます。
/// 生成時に矩形であることを検証するため、シリアライザは列数の不一致を考慮しません。
///
/// グリッドはシート上の使用範囲だけを保持し、その左上セルの位置を`origin`として記録します。
/// `A1`から`origin`までの領域は保持せず、`cell()`は`Empty`を返します。
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
    /// 保持しているグリッドの左上セル（0始まりの行, 列）
    origin: (usize, usize),
}

impl Sheet {
    /// 行データからシートを生成する（グリッドは`A1`から始まる）
    ///
    /// # 戻り値
    ///
    /// * `Ok(Sheet)` - すべての行の列数が一致する場合
    /// * `Err(XlsxConvError::MalformedData)` - 列数が一致しない行がある場合
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, XlsxConvError> {
        Self::with_origin(name, rows, (0, 0))
    }

    /// 左上セルの位置を指定してシートを生成する
    ///
    /// `origin`は0始まりの`(行, 列)`です。`(14, 2)`ならグリッドの先頭セルは`C15`になります。
    pub fn with_origin(
        name: impl Into<String>,
        rows: Vec<Vec<CellValue>>,
        origin: (usize, usize),
    ) -> Result<Self, XlsxConvError> {
        let name = name.into();
        let width = rows.first().map(Vec::len).unwrap_or(0);

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(XlsxConvError::MalformedData {
                sheet: name,
                row: origin.0 + index + 1,
                expected: width,
                found: row.len(),
            });
        }

        Ok(Self {
            name,
            rows,
            width,
            origin,
        })
    }

    /// 列数が揃っていない行を`Empty`で埋めてシートを生成する
    ///
    /// 列数は最も長い行に合わせます。
    pub fn padded(name: impl Into<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self {
            name: name.into(),
            rows,
            width,
            origin: (0, 0),
        }
    }

    /// 空のシートを生成する
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            width: 0,
            origin: (0, 0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 保持しているグリッドの行（先頭行の位置は`row_offset()`）
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// グリッドの先頭行の位置（0始まり）
    pub fn row_offset(&self) -> usize {
        self.origin.0
    }

    /// グリッドの先頭列の位置（0始まり）
    pub fn column_offset(&self) -> usize {
        self.origin.1
    }

    /// `A1`から最終行までの行数
    pub fn row_count(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.origin.0 + self.rows.len()
        }
    }

    /// `A1`から最終列までの列数
    pub fn column_count(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.origin.1 + self.width
        }
    }

    /// 0始まりのシート座標でセルを取得
    ///
    /// 範囲外なら`None`、グリッドより左上の領域なら`Empty`を返します。
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        if row >= self.row_count() || col >= self.column_count() {
            return None;
        }
        match (row.checked_sub(self.origin.0), col.checked_sub(self.origin.1)) {
            (Some(r), Some(c)) => self.rows.get(r).and_then(|cells| cells.get(c)),
            _ => Some(&EMPTY_CELL),
        }
    }
}

/// ワークブック
///
/// 表示名（元ファイル名）と、順序付きのシート列を持ちます。
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    name: String,
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(name: impl Into<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            name: name.into(),
            sheets,
        }
    }

    /// ワークブック名（元ファイルのベース名）
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// シート名で検索
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
