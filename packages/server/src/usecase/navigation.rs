//! UseCase: ページ移動
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - report_num_pages / goto / step
//!
//! ### なぜこのテストが必要か
//! - 現在ページが常に [1, num_pages] に収まることを保証
//! - ロック中は保持者以外が移動できないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：クランプ付きの移動
//! - 異常系：他者がロック中の移動（lock_denied）
//! - エッジケース：delta = 0 の step、ページ数未知

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LockDenied, RoomId, ViewState, ViewStateError, ViewStateRepository,
};

/// ページ移動のユースケース
pub struct NavigationUseCase {
    view_states: Arc<dyn ViewStateRepository>,
}

impl NavigationUseCase {
    /// 新しい NavigationUseCase を作成
    pub fn new(view_states: Arc<dyn ViewStateRepository>) -> Self {
        Self { view_states }
    }

    /// クライアントが読み込んだ資料のページ数を記録（ロック不要）
    ///
    /// # Returns
    ///
    /// * `Ok(ViewState)` - 更新後の ViewState（部屋全体に sync する）
    /// * `Err(ViewStateError)` - ページ数が正でない（何もしない）
    pub async fn report_num_pages(
        &self,
        room: &RoomId,
        num_pages: i64,
    ) -> Result<ViewState, ViewStateError> {
        let mut view = self.view_states.get_or_create(room).await;
        view.set_num_pages(num_pages)?;
        self.view_states.save(room, view.clone()).await;
        Ok(view)
    }

    /// 指定ページへ移動
    ///
    /// # Returns
    ///
    /// * `Ok(ViewState)` - 移動後の ViewState（部屋全体に sync する）
    /// * `Err(LockDenied)` - 他の接続がロック中（要求者にのみ通知する）
    pub async fn goto(
        &self,
        room: &RoomId,
        requester: &ConnectionId,
        page: i64,
    ) -> Result<ViewState, LockDenied> {
        let mut view = self.view_states.get_or_create(room).await;
        view.goto(requester, page)?;
        self.view_states.save(room, view.clone()).await;
        Ok(view)
    }

    /// 相対移動。`delta == 0` は何もしない (`Ok(None)`)
    pub async fn step(
        &self,
        room: &RoomId,
        requester: &ConnectionId,
        delta: i64,
    ) -> Result<Option<ViewState>, LockDenied> {
        if delta == 0 {
            return Ok(None);
        }
        let target = self.view_states.get_or_create(room).await.step_target(delta);
        self.goto(room, requester, target).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryViewStateRepository;
    use std::num::NonZeroUsize;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn create_test_usecase() -> (NavigationUseCase, Arc<InMemoryViewStateRepository>) {
        let view_states = Arc::new(InMemoryViewStateRepository::new(
            NonZeroUsize::new(16).unwrap(),
        ));
        (NavigationUseCase::new(view_states.clone()), view_states)
    }

    #[tokio::test]
    async fn test_report_num_pages_sets_count() {
        // テスト項目: ページ数を報告すると ViewState に反映される
        // given (前提条件):
        let (usecase, view_states) = create_test_usecase();

        // when (操作):
        let result = usecase.report_num_pages(&room("r1"), 10).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().num_pages(), Some(10));
        assert_eq!(
            view_states.get_or_create(&room("r1")).await.num_pages(),
            Some(10)
        );
    }

    #[tokio::test]
    async fn test_report_num_pages_ignores_lock() {
        // テスト項目: ページ数の報告はロック中でも誰でも行える
        // given (前提条件):
        let (usecase, view_states) = create_test_usecase();
        let mut locked = ViewState::new();
        locked.lock(&conn("alice"));
        view_states.save(&room("r1"), locked).await;

        // when (操作):
        let result = usecase.report_num_pages(&room("r1"), 4).await;

        // then (期待する結果):
        let view = result.unwrap();
        assert_eq!(view.num_pages(), Some(4));
        assert_eq!(view.locked_by(), Some(&conn("alice")));
    }

    #[tokio::test]
    async fn test_report_num_pages_rejects_non_positive() {
        // テスト項目: 0 以下のページ数は拒否され、状態は変わらない
        // given (前提条件):
        let (usecase, view_states) = create_test_usecase();

        // when (操作):
        let result = usecase.report_num_pages(&room("r1"), 0).await;

        // then (期待する結果):
        assert_eq!(result, Err(ViewStateError::InvalidPageCount(0)));
        assert_eq!(view_states.get_or_create(&room("r1")).await, ViewState::new());
    }

    #[tokio::test]
    async fn test_goto_clamps_to_page_range() {
        // テスト項目: num_pages = 10 のとき goto(999) は 10、goto(-5) は 1
        // given (前提条件):
        let (usecase, _) = create_test_usecase();
        let alice = conn("alice");
        usecase.report_num_pages(&room("r2"), 10).await.unwrap();

        // when (操作):
        let high = usecase.goto(&room("r2"), &alice, 999).await.unwrap();
        let low = usecase.goto(&room("r2"), &alice, -5).await.unwrap();

        // then (期待する結果):
        assert_eq!(high.current_page(), 10);
        assert_eq!(low.current_page(), 1);
    }

    #[tokio::test]
    async fn test_goto_denied_when_locked_by_other() {
        // テスト項目: 他者がロック中の goto は lock_denied となり、ページは変わらない
        // given (前提条件):
        let (usecase, view_states) = create_test_usecase();
        let mut locked = ViewState::new();
        locked.lock(&conn("alice"));
        view_states.save(&room("r1"), locked).await;

        // when (操作):
        let result = usecase.goto(&room("r1"), &conn("bob"), 5).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(LockDenied {
                locked_by: conn("alice")
            })
        );
        assert_eq!(view_states.get_or_create(&room("r1")).await.current_page(), 1);
    }

    #[tokio::test]
    async fn test_step_moves_relative_to_current_page() {
        // テスト項目: step は現在ページからの相対移動で、範囲内にクランプされる
        // given (前提条件):
        let (usecase, _) = create_test_usecase();
        let alice = conn("alice");
        usecase.report_num_pages(&room("r1"), 5).await.unwrap();
        usecase.goto(&room("r1"), &alice, 3).await.unwrap();

        // when (操作):
        let forward = usecase.step(&room("r1"), &alice, 1).await.unwrap();
        let overshoot = usecase.step(&room("r1"), &alice, 10).await.unwrap();
        let back = usecase.step(&room("r1"), &alice, -2).await.unwrap();

        // then (期待する結果):
        assert_eq!(forward.map(|v| v.current_page()), Some(4));
        assert_eq!(overshoot.map(|v| v.current_page()), Some(5));
        assert_eq!(back.map(|v| v.current_page()), Some(3));
    }

    #[tokio::test]
    async fn test_step_zero_is_no_op() {
        // テスト項目: delta = 0 の step は何もしない（ロック中でも拒否されない）
        // given (前提条件):
        let (usecase, view_states) = create_test_usecase();
        let mut locked = ViewState::new();
        locked.lock(&conn("alice"));
        view_states.save(&room("r1"), locked).await;

        // when (操作):
        let result = usecase.step(&room("r1"), &conn("bob"), 0).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_step_denied_when_locked_by_other() {
        // テスト項目: 他者がロック中の step は goto と同様に拒否される
        // given (前提条件):
        let (usecase, view_states) = create_test_usecase();
        let mut locked = ViewState::new();
        locked.lock(&conn("alice"));
        view_states.save(&room("r1"), locked).await;

        // when (操作):
        let result = usecase.step(&room("r1"), &conn("bob"), 1).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(LockDenied {
                locked_by: conn("alice")
            })
        );
    }
}
