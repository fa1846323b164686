//! 接続ごとのライフサイクル
//!
//! ```text
//! Connecting → Registered → Active → Unregistering → Closed
//! ```
//!
//! Reader の終了・Writer の終了・Hub による追い出しのどれが先に起きても、
//! Unregister を発行する遷移（`begin_teardown` が `true` を返す）は一度だけ。

use super::error::ConnectionStateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// ハンドシェイク完了、Hub 未登録
    Connecting,
    /// Hub に登録済み、ポンプ未起動
    Registered,
    /// Reader / Writer が稼働中
    Active,
    /// Unregister 発行済み、トランスポート解放待ち
    Unregistering,
    /// 終了
    Closed,
}

/// 接続終了のきっかけ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownCause {
    /// Reader が終了した（切断・タイムアウト・読み込みエラー）
    ReaderExited,
    /// Writer が終了した（書き込み失敗、またはキューが閉じられた）
    WriterExited,
    /// ポンプが起動する前に接続処理が中断された
    Aborted,
}

impl ConnectionState {
    pub fn register(self) -> Result<Self, ConnectionStateError> {
        match self {
            Self::Connecting => Ok(Self::Registered),
            from => Err(ConnectionStateError {
                from,
                event: "register",
            }),
        }
    }

    pub fn activate(self) -> Result<Self, ConnectionStateError> {
        match self {
            Self::Registered => Ok(Self::Active),
            from => Err(ConnectionStateError {
                from,
                event: "activate",
            }),
        }
    }

    /// 終了処理を開始する
    ///
    /// 戻り値の `bool` は Unregister を発行すべきかどうか。
    pub fn begin_teardown(self) -> (Self, bool) {
        match self {
            Self::Registered | Self::Active => (Self::Unregistering, true),
            Self::Connecting => (Self::Closed, false),
            Self::Unregistering | Self::Closed => (self, false),
        }
    }

    pub fn finish(self) -> Result<Self, ConnectionStateError> {
        match self {
            Self::Unregistering | Self::Closed => Ok(Self::Closed),
            from => Err(ConnectionStateError {
                from,
                event: "finish",
            }),
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        // テスト項目: 正常系の遷移 Connecting → Registered → Active → Unregistering → Closed
        // given (前提条件):
        let state = ConnectionState::Connecting;

        // when (操作):
        let state = state.register().unwrap();
        let state = state.activate().unwrap();
        let (state, should_unregister) = state.begin_teardown();
        let state = state.finish().unwrap();

        // then (期待する結果):
        assert!(should_unregister);
        assert_eq!(state, ConnectionState::Closed);
    }

    #[test]
    fn test_begin_teardown_only_once() {
        // テスト項目: 二度目以降の終了処理では Unregister を発行しない
        // given (前提条件):
        let (state, first) = ConnectionState::Active.begin_teardown();

        // when (操作):
        let (state, second) = state.begin_teardown();
        let closed = state.finish().unwrap();
        let (_, third) = closed.begin_teardown();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert!(!third);
    }

    #[test]
    fn test_teardown_before_registration_skips_unregister() {
        // テスト項目: 登録前の中断では Unregister を発行せず即 Closed になる
        // given (前提条件):
        let state = ConnectionState::Connecting;

        // when (操作):
        let (state, should_unregister) = state.begin_teardown();

        // then (期待する結果):
        assert!(!should_unregister);
        assert!(state.is_closed());
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        // テスト項目: 不正な遷移はエラーになる
        // given (前提条件):

        // when (操作):
        let register_twice = ConnectionState::Registered.register();
        let activate_before_register = ConnectionState::Connecting.activate();
        let finish_while_active = ConnectionState::Active.finish();

        // then (期待する結果):
        assert_eq!(
            register_twice,
            Err(ConnectionStateError {
                from: ConnectionState::Registered,
                event: "register",
            })
        );
        assert!(activate_before_register.is_err());
        assert!(finish_while_active.is_err());
    }
}
