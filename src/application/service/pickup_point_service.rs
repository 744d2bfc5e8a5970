use crate::application::ApplicationError;
use crate::domain::model::{
    City, Pagination, PickupPoint, PickupPointOverview, PickupPointPage, Principal,
    ReceptionOverview, RegistrationPeriod, Role,
};
use crate::domain::port::{PickupPointRepository, ProductRepository, ReceptionRepository};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// 受付ポイントアプリケーションサービス
/// 受付ポイントの登録と、受付・商品を含めた一覧の組み立てを行う
pub struct PickupPointApplicationService {
    pickup_point_repository: Arc<dyn PickupPointRepository>,
    reception_repository: Arc<dyn ReceptionRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl PickupPointApplicationService {
    /// 新しい受付ポイントアプリケーションサービスを作成
    pub fn new(
        pickup_point_repository: Arc<dyn PickupPointRepository>,
        reception_repository: Arc<dyn ReceptionRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            pickup_point_repository,
            reception_repository,
            product_repository,
        }
    }

    /// 受付ポイントを登録
    /// moderatorのみ実行できる
    ///
    /// # Arguments
    /// * `principal` - 呼び出し元
    /// * `city` - 開設する都市
    #[instrument(skip(self, principal), fields(subject = %principal.subject_id()))]
    pub async fn create_pickup_point(
        &self,
        principal: &Principal,
        city: City,
    ) -> Result<PickupPoint, ApplicationError> {
        principal.require_role(Role::Moderator, "create pickup points")?;

        let pickup_point = PickupPoint::register(city);
        self.pickup_point_repository.save(&pickup_point).await?;

        info!(pvz_id = %pickup_point.id(), "pickup point created");
        Ok(pickup_point)
    }

    /// 受付ポイントの一覧を取得
    /// 各受付ポイントに受付（新しい順）と、各受付に商品（新しい順）を付けて返す
    ///
    /// # Arguments
    /// * `period` - 登録日時の絞り込み期間
    /// * `pagination` - ページング指定
    ///
    /// # Returns
    /// * `Ok(PickupPointPage)` - 条件に一致する全件数と、指定ページの受付ポイント
    #[instrument(skip(self, principal), fields(role = %principal.role()))]
    pub async fn list_pickup_points(
        &self,
        principal: &Principal,
        period: RegistrationPeriod,
        pagination: Pagination,
    ) -> Result<PickupPointPage, ApplicationError> {
        let total = self.pickup_point_repository.count(&period).await?;
        let pickup_points = self
            .pickup_point_repository
            .find_page(&period, pagination.offset(), pagination.limit())
            .await?;

        let mut items = Vec::with_capacity(pickup_points.len());
        for pickup_point in pickup_points {
            let receptions = self
                .reception_repository
                .find_by_point(pickup_point.id())
                .await?;

            let mut reception_overviews = Vec::with_capacity(receptions.len());
            for reception in receptions {
                let products = self
                    .product_repository
                    .find_by_reception(reception.id())
                    .await?;
                reception_overviews.push(ReceptionOverview {
                    reception,
                    products,
                });
            }

            items.push(PickupPointOverview {
                pickup_point,
                receptions: reception_overviews,
            });
        }

        debug!(total, returned = items.len(), "pickup points listed");
        Ok(PickupPointPage { total, items })
    }
}
