//! Cancellation Module
//!
//! 協調的キャンセルの仕組みを提供するモジュール。
//! デコードと各シリアライザは、シート・行・セルの各ループの先頭でキャンセル要求を確認します。

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::XlsxConvError;

/// キャンセル要求の発信元
///
/// 呼び出し側は任意のタイミングでキャンセルを要求でき、変換処理は次の確認時点で
/// `XlsxConvError::Cancelled`を返して中断します。
pub trait CancellationSignal: fmt::Debug + Send + Sync {
    /// キャンセルが要求されているか
    fn is_cancelled(&self) -> bool;
}

/// 共有フラグによるキャンセルトークン
///
/// クローンはすべて同じフラグを共有します。
///
/// # 使用例
///
/// ```rust
/// use xlsxconv::{CancellationSignal, CancellationToken};
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセルを要求する
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// キャンセルされない信号（トークン未指定時に使用）
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NeverCancelled;

impl CancellationSignal for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// キャンセル要求を確認し、要求されていればエラーを返す
pub(crate) fn checkpoint(signal: &dyn CancellationSignal) -> Result<(), XlsxConvError> {
    if signal.is_cancelled() {
        Err(XlsxConvError::Cancelled)
    } else {
        Ok(())
    }
}
