use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Principal, Product, ProductType, PvzId, Reception, Role};
use crate::domain::port::{ProductRepository, ReceptionRepository};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// 商品アプリケーションサービス
/// 商品は受付ポイントの開いている受付の末尾にのみ追加・削除できる
/// 呼び出し元が受付IDや商品IDを指定することはない
pub struct ProductApplicationService {
    reception_repository: Arc<dyn ReceptionRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl ProductApplicationService {
    /// 新しい商品アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `reception_repository` - 受付リポジトリ
    /// * `product_repository` - 商品リポジトリ
    pub fn new(
        reception_repository: Arc<dyn ReceptionRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            reception_repository,
            product_repository,
        }
    }

    async fn resolve_open_reception(&self, pvz_id: PvzId) -> Result<Reception, ApplicationError> {
        let reception = self
            .reception_repository
            .find_open_by_point(pvz_id)
            .await?
            .ok_or(DomainError::NoActiveReception(pvz_id))?;
        reception.ensure_open()?;
        Ok(reception)
    }

    /// 開いている受付に商品を追加
    /// 事前条件:
    /// - 呼び出し元がemployee
    /// - 受付ポイントに開いている受付がある
    ///
    /// # Returns
    /// * `Ok(Product)` - 追加された商品
    /// * `Err(ApplicationError)` - 開いている受付がない、受付が既に閉じられた
    #[instrument(skip(self, principal), fields(subject = %principal.subject_id()))]
    pub async fn add_product(
        &self,
        principal: &Principal,
        pvz_id: PvzId,
        product_type: ProductType,
    ) -> Result<Product, ApplicationError> {
        principal.require_role(Role::Employee, "add products")?;

        let reception = self.resolve_open_reception(pvz_id).await?;
        let product = Product::new(reception.id(), product_type);

        // 受付が開いている場合のみ書き込まれる
        if !self.product_repository.insert_into_open(&product).await? {
            return Err(DomainError::ReceptionAlreadyClosed.into());
        }

        info!(product_id = %product.id(), reception_id = %reception.id(), "product added");
        Ok(product)
    }

    /// 開いている受付の最後に追加された商品を削除
    /// 事前条件:
    /// - 呼び出し元がemployee
    /// - 受付ポイントに開いている受付があり、商品が1つ以上ある
    ///
    /// # Returns
    /// * `Ok(Product)` - 削除された商品
    /// * `Err(ApplicationError)` - 削除する商品がない、並行する削除に先を越された
    #[instrument(skip(self, principal), fields(subject = %principal.subject_id()))]
    pub async fn delete_last_product(
        &self,
        principal: &Principal,
        pvz_id: PvzId,
    ) -> Result<Product, ApplicationError> {
        principal.require_role(Role::Employee, "delete products")?;

        let reception = self.resolve_open_reception(pvz_id).await?;
        let last = self
            .product_repository
            .find_last_by_reception(reception.id())
            .await?
            .ok_or(DomainError::NoProductsToDelete)?;

        if !self
            .product_repository
            .delete(last.id(), reception.id())
            .await?
        {
            error!(product_id = %last.id(), "product vanished before delete");
            return Err(ApplicationError::Internal(format!(
                "product {} was not deleted",
                last.id()
            )));
        }

        info!(product_id = %last.id(), reception_id = %reception.id(), "product deleted");
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::driven::InMemoryStore;
    use crate::domain::error::ErrorKind;
    use crate::domain::model::{City, PickupPoint, ProductId, ReceptionId, UserId};
    use crate::domain::port::{PickupPointRepository, RepositoryError};
    use async_trait::async_trait;

    fn employee() -> Principal {
        Principal::new(UserId::new(), Role::Employee)
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: ProductApplicationService,
        pvz_id: PvzId,
    }

    async fn setup_with_open_reception() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let point = PickupPoint::register(City::Kazan);
        store.save(&point).await.unwrap();
        store
            .insert_open(&Reception::open(point.id()))
            .await
            .unwrap();
        Fixture {
            service: ProductApplicationService::new(store.clone(), store.clone()),
            store,
            pvz_id: point.id(),
        }
    }

    // 最後の商品の取得後に別の呼び出しが削除した状態を再現するモック
    struct VanishingProductRepository;

    #[async_trait]
    impl ProductRepository for VanishingProductRepository {
        async fn insert_into_open(&self, _product: &Product) -> Result<bool, RepositoryError> {
            Ok(true)
        }

        async fn find_last_by_reception(
            &self,
            reception_id: ReceptionId,
        ) -> Result<Option<Product>, RepositoryError> {
            Ok(Some(Product::new(reception_id, ProductType::Shoes)))
        }

        async fn delete(
            &self,
            _product_id: ProductId,
            _reception_id: ReceptionId,
        ) -> Result<bool, RepositoryError> {
            Ok(false)
        }

        async fn find_by_reception(
            &self,
            _reception_id: ReceptionId,
        ) -> Result<Vec<Product>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_add_product_to_open_reception() {
        let fixture = setup_with_open_reception().await;

        let product = fixture
            .service
            .add_product(&employee(), fixture.pvz_id, ProductType::Electronics)
            .await
            .unwrap();

        assert_eq!(product.product_type(), ProductType::Electronics);
        let open = fixture
            .store
            .find_open_by_point(fixture.pvz_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.reception_id(), open.id());
    }

    #[tokio::test]
    async fn test_add_product_requires_employee() {
        let fixture = setup_with_open_reception().await;
        let moderator = Principal::new(UserId::new(), Role::Moderator);

        let err = fixture
            .service
            .add_product(&moderator, fixture.pvz_id, ProductType::Clothes)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_add_product_without_open_reception() {
        let fixture = setup_with_open_reception().await;
        let open = fixture
            .store
            .find_open_by_point(fixture.pvz_id)
            .await
            .unwrap()
            .unwrap();
        fixture.store.close(open.id()).await.unwrap();

        let err = fixture
            .service
            .add_product(&employee(), fixture.pvz_id, ProductType::Shoes)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::DomainError(DomainError::NoActiveReception(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_last_product_is_lifo() {
        let fixture = setup_with_open_reception().await;
        let principal = employee();
        let first = fixture
            .service
            .add_product(&principal, fixture.pvz_id, ProductType::Electronics)
            .await
            .unwrap();
        let second = fixture
            .service
            .add_product(&principal, fixture.pvz_id, ProductType::Clothes)
            .await
            .unwrap();

        let deleted = fixture
            .service
            .delete_last_product(&principal, fixture.pvz_id)
            .await
            .unwrap();
        assert_eq!(deleted.id(), second.id());

        let deleted = fixture
            .service
            .delete_last_product(&principal, fixture.pvz_id)
            .await
            .unwrap();
        assert_eq!(deleted.id(), first.id());
    }

    #[tokio::test]
    async fn test_delete_from_empty_reception() {
        let fixture = setup_with_open_reception().await;

        let err = fixture
            .service
            .delete_last_product(&employee(), fixture.pvz_id)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::DomainError(DomainError::NoProductsToDelete)
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_lost_delete_race_is_internal() {
        let store = Arc::new(InMemoryStore::new());
        let point = PickupPoint::register(City::Moscow);
        store.save(&point).await.unwrap();
        store
            .insert_open(&Reception::open(point.id()))
            .await
            .unwrap();
        let service = ProductApplicationService::new(store, Arc::new(VanishingProductRepository));

        let err = service
            .delete_last_product(&employee(), point.id())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
