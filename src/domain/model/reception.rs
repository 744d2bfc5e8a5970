use crate::domain::error::DomainError;
use crate::domain::model::{PvzId, ReceptionId, ReceptionStatus};
use chrono::{DateTime, Utc};

/// Reception集約
/// 受付ポイントでの商品受け入れセッション
/// 1つの受付ポイントに開いている受付は最大1つ
#[derive(Debug, Clone, PartialEq)]
pub struct Reception {
    id: ReceptionId,
    date_time: DateTime<Utc>,
    pvz_id: PvzId,
    status: ReceptionStatus,
}

impl Reception {
    /// 新しい受付を開始
    /// 初期ステータスはInProgress
    pub fn open(pvz_id: PvzId) -> Self {
        Self {
            id: ReceptionId::new(),
            date_time: Utc::now(),
            pvz_id,
            status: ReceptionStatus::InProgress,
        }
    }

    /// データベースから取得したデータで受付を再構築
    pub fn reconstruct(
        id: ReceptionId,
        date_time: DateTime<Utc>,
        pvz_id: PvzId,
        status: ReceptionStatus,
    ) -> Self {
        Self {
            id,
            date_time,
            pvz_id,
            status,
        }
    }

    pub fn id(&self) -> ReceptionId {
        self.id
    }

    pub fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    pub fn pvz_id(&self) -> PvzId {
        self.pvz_id
    }

    pub fn status(&self) -> ReceptionStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::InProgress
    }

    /// 商品の追加・削除ができる状態かを確認する
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::ReceptionAlreadyClosed)
        }
    }

    /// 受付を閉じる
    /// 事前条件:
    /// - ステータスがInProgress
    /// Closedは終端状態で再オープンはない
    pub fn close(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.status = ReceptionStatus::Closed;
        Ok(())
    }
}
