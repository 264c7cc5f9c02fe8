//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// xlsxconvクレート全体で使用するエラー型
///
/// ワークブックの読み込み、デコード、XML/CSV/JSONへのシリアライズ中に
/// 発生するすべてのエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `FileAccess`: ファイルを開けない（存在しない、ロック中、権限不足）
/// - `UnsupportedFormat`: 内容がスプレッドシートとしてデコードできない
/// - `Parse`: ワークブックは開けたが、シートのデコードに失敗した
/// - `Cancelled`: 協調的キャンセルが受理された
/// - `MalformedData`: グリッドが矩形ではない
/// - `InvalidXmlCharacter`: XMLで表現できない文字を含む
/// - `Config`: 設定の検証に失敗した
#[derive(Error, Debug)]
pub enum XlsxConvError {
    /// ファイルを開けなかったエラー
    #[error("Cannot access file '{}': {source}", path.display())]
    FileAccess {
        /// 対象ファイルのパス
        path: PathBuf,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// スプレッドシートとして認識できない内容
    ///
    /// 形式の判定はcalamineが内容から行います。拡張子は参照しません。
    #[error("Unsupported spreadsheet format in '{}': {source}", path.display())]
    UnsupportedFormat {
        /// 対象ファイルのパス（リーダー入力の場合はワークブック名）
        path: PathBuf,
        /// calamineのエラー
        #[source]
        source: calamine::Error,
    },

    /// シートのデコード中に発生したエラー
    ///
    /// `#[from]`属性により、`calamine::Error`から自動的に変換されます。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// キャンセル要求が受理され、変換を中断した
    #[error("Conversion was cancelled")]
    Cancelled,

    /// 行ごとの列数が揃っていないグリッド
    #[error("Malformed sheet '{sheet}': row {row} has {found} cells, expected {expected}")]
    MalformedData {
        /// シート名
        sheet: String,
        /// 問題のある行（1始まり）
        row: usize,
        /// 期待される列数
        expected: usize,
        /// 実際の列数
        found: usize,
    },

    /// XML 1.0で表現できない文字を含む値
    ///
    /// 制御文字（TAB/LF/CRを除く）や`U+FFFE`/`U+FFFF`はエスケープしても整形式のXMLになりません。
    #[error("Cannot write {location} as XML: character U+{code:04X} is not allowed")]
    InvalidXmlCharacter {
        /// 値の位置（シート名・セル参照など）
        location: String,
        /// 問題の文字のコードポイント
        code: u32,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時、またはJSONからオプションを読み込む際に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxconv::{ConverterBuilder, XlsxConvError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_csv_separator("")
    ///     .build();
    ///
    /// match result {
    ///     Err(XlsxConvError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 読み込み後のI/Oエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML出力中のエラー
    #[error("XML serialization error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON出力中のエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XlsxConvError {
    /// エラーの完全な説明を生成する
    ///
    /// 表示メッセージに続けて、`source()`チェーンのうちまだ含まれていない
    /// メッセージを`": "`区切りで連結します。失敗結果のメッセージに使用します。
    pub fn full_description(&self) -> String {
        let mut description = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !description.contains(&text) {
                description.push_str(": ");
                description.push_str(&text);
            }
            source = cause.source();
        }
        description
    }

    /// キャンセルによるエラーかどうか
    pub fn is_cancelled(&self) -> bool {
        matches!(self, XlsxConvError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_access_error_display() {
        let error = XlsxConvError::FileAccess {
            path: PathBuf::from("missing.xlsx"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("Cannot access file"));
        assert!(error_msg.contains("missing.xlsx"));
        assert!(error_msg.contains("No such file"));
    }

    #[test]
    fn test_file_access_error_source() {
        let error = XlsxConvError::FileAccess {
            path: PathBuf::from("locked.xlsx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        };

        let source = std::error::Error::source(&error).expect("source should be set");
        assert_eq!(source.to_string(), "Permission denied");
    }

    #[test]
    fn test_unsupported_format_error_display() {
        let error = XlsxConvError::UnsupportedFormat {
            path: PathBuf::from("notes.txt"),
            source: calamine::Error::Msg("Cannot detect file format"),
        };

        let error_msg = error.to_string();
        assert!(error_msg.starts_with("Unsupported spreadsheet format"));
        assert!(error_msg.contains("notes.txt"));
        assert!(error_msg.contains("Cannot detect file format"));
    }

    // Parseエラーのテスト
    #[test]
    fn test_parse_error_from_calamine() {
        let parse_err = calamine::Error::Msg("Corrupted sheet");
        let error: XlsxConvError = parse_err.into();

        match error {
            XlsxConvError::Parse(calamine::Error::Msg(msg)) => {
                assert_eq!(msg, "Corrupted sheet");
            }
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_malformed_data_display() {
        let error = XlsxConvError::MalformedData {
            sheet: "Sheet1".to_string(),
            row: 3,
            expected: 4,
            found: 2,
        };

        assert_eq!(
            error.to_string(),
            "Malformed sheet 'Sheet1': row 3 has 2 cells, expected 4"
        );
    }

    #[test]
    fn test_invalid_xml_character_display() {
        let error = XlsxConvError::InvalidXmlCharacter {
            location: "cell B2 of sheet \"Data\"".to_string(),
            code: 0x1,
        };
        assert_eq!(
            error.to_string(),
            "Cannot write cell B2 of sheet \"Data\" as XML: character U+0001 is not allowed"
        );
    }

    #[test]
    fn test_cancelled() {
        assert!(XlsxConvError::Cancelled.is_cancelled());
        assert!(!XlsxConvError::Config("x".to_string()).is_cancelled());
        assert_eq!(XlsxConvError::Cancelled.to_string(), "Conversion was cancelled");
    }

    #[test]
    fn test_full_description_does_not_repeat_source() {
        let error = XlsxConvError::FileAccess {
            path: PathBuf::from("a.xlsx"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };

        let description = error.full_description();
        assert_eq!(description.matches("gone").count(), 1);
    }

    #[test]
    fn test_io_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlsxConvError> {
            Err(io::Error::other("broken pipe"))?;
            Ok(())
        }

        match io_operation() {
            Err(XlsxConvError::Io(e)) => assert_eq!(e.to_string(), "broken pipe"),
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        let config_err = XlsxConvError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));

        let io_err: XlsxConvError = io::Error::other("test io").into();
        assert!(io_err.to_string().starts_with("IO error"));

        let parse_err: XlsxConvError = calamine::Error::Msg("test parse").into();
        assert!(parse_err
            .to_string()
            .starts_with("Failed to parse Excel file"));
    }
}
