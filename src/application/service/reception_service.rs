use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Principal, PvzId, Reception, Role};
use crate::domain::port::{ReceptionRepository, RepositoryError};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 受付アプリケーションサービス
/// 受付ポイントごとに開いている受付が最大1つであることを保証する
pub struct ReceptionApplicationService {
    reception_repository: Arc<dyn ReceptionRepository>,
}

impl ReceptionApplicationService {
    /// 新しい受付アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `reception_repository` - 受付リポジトリ
    pub fn new(reception_repository: Arc<dyn ReceptionRepository>) -> Self {
        Self {
            reception_repository,
        }
    }

    /// 受付を開始
    /// 事前条件:
    /// - 呼び出し元がemployee
    /// - 受付ポイントに開いている受付がない
    ///
    /// 事前チェックは分かりやすいエラーを返すためのもので、
    /// 最終的な判定はストレージの一意制約で行う
    ///
    /// # Returns
    /// * `Ok(Reception)` - 開始された受付
    /// * `Err(ApplicationError)` - ロール不一致、既に開いている受付がある、受付ポイントが存在しない
    #[instrument(skip(self, principal), fields(subject = %principal.subject_id()))]
    pub async fn open_reception(
        &self,
        principal: &Principal,
        pvz_id: PvzId,
    ) -> Result<Reception, ApplicationError> {
        principal.require_role(Role::Employee, "open receptions")?;

        if self
            .reception_repository
            .find_open_by_point(pvz_id)
            .await?
            .is_some()
        {
            return Err(DomainError::ReceptionAlreadyOpen.into());
        }

        let reception = Reception::open(pvz_id);
        match self.reception_repository.insert_open(&reception).await {
            Ok(()) => {
                info!(reception_id = %reception.id(), "reception opened");
                Ok(reception)
            }
            Err(RepositoryError::UniqueViolation(detail)) => {
                warn!(%detail, "concurrent reception open rejected by storage");
                Err(DomainError::ReceptionAlreadyOpen.into())
            }
            Err(RepositoryError::ForeignKeyViolation(_)) => {
                Err(DomainError::UnknownPickupPoint(pvz_id).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 受付ポイントの開いている受付を閉じる
    /// 認証済みであればロールは問わない
    ///
    /// # Returns
    /// * `Ok(Reception)` - 閉じた後の受付
    /// * `Err(ApplicationError)` - 開いている受付がない
    #[instrument(skip(self, principal), fields(subject = %principal.subject_id(), role = %principal.role()))]
    pub async fn close_last_reception(
        &self,
        principal: &Principal,
        pvz_id: PvzId,
    ) -> Result<Reception, ApplicationError> {
        let open = self
            .reception_repository
            .find_open_by_point(pvz_id)
            .await?
            .ok_or(DomainError::NoActiveReception(pvz_id))?;

        // 取得から更新までの間に別の呼び出しが閉じた場合はNoneが返る
        let closed = self
            .reception_repository
            .close(open.id())
            .await?
            .ok_or(DomainError::NoActiveReception(pvz_id))?;

        info!(reception_id = %closed.id(), "reception closed");
        Ok(closed)
    }

    /// 受付ポイントのすべての受付を開始日時の降順で取得
    #[instrument(skip(self, _principal))]
    pub async fn list_receptions_for_point(
        &self,
        _principal: &Principal,
        pvz_id: PvzId,
    ) -> Result<Vec<Reception>, ApplicationError> {
        self.reception_repository
            .find_by_point(pvz_id)
            .await
            .map_err(ApplicationError::from)
    }
}
