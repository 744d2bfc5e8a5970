use crate::domain::model::{
    Email, PickupPoint, Product, ProductId, PvzId, Reception, ReceptionId, RegistrationPeriod,
    UserAccount,
};
use crate::domain::port::{
    PickupPointRepository, ProductRepository, ReceptionRepository, RepositoryError, UserRepository,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

// 各Vecは挿入順を保持する
#[derive(Default)]
struct StoreState {
    pickup_points: Vec<PickupPoint>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
    users: Vec<UserAccount>,
}

impl StoreState {
    fn has_open_reception(&self, reception_id: ReceptionId) -> bool {
        self.receptions
            .iter()
            .any(|r| r.id() == reception_id && r.is_open())
    }
}

/// インメモリストア
/// すべてのリポジトリトレイトを実装する。サービスとAPIのテストで使う
/// 全操作を1つの非同期ロックで直列化し、PostgreSQL実装と同じ制約を再現する
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PickupPointRepository for InMemoryStore {
    async fn save(&self, pickup_point: &PickupPoint) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state
            .pickup_points
            .iter()
            .any(|p| p.id() == pickup_point.id())
        {
            return Err(RepositoryError::UniqueViolation("pvz_pkey".to_string()));
        }
        state.pickup_points.push(pickup_point.clone());
        Ok(())
    }

    async fn count(&self, period: &RegistrationPeriod) -> Result<u64, RepositoryError> {
        let state = self.state.lock().await;
        let count = state
            .pickup_points
            .iter()
            .filter(|p| period.contains(p.registration_date()))
            .count();
        Ok(count as u64)
    }

    async fn find_page(
        &self,
        period: &RegistrationPeriod,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<PickupPoint>, RepositoryError> {
        let state = self.state.lock().await;
        // 同時刻の場合は後から登録したものを先にする
        let mut matching: Vec<PickupPoint> = state
            .pickup_points
            .iter()
            .rev()
            .filter(|p| period.contains(p.registration_date()))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.registration_date().cmp(&a.registration_date()));

        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl ReceptionRepository for InMemoryStore {
    async fn insert_open(&self, reception: &Reception) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        let pvz_id = reception.pvz_id();

        if !state.pickup_points.iter().any(|p| p.id() == pvz_id) {
            return Err(RepositoryError::ForeignKeyViolation(
                "reception_pvz_id_fkey".to_string(),
            ));
        }
        if state
            .receptions
            .iter()
            .any(|r| r.pvz_id() == pvz_id && r.is_open())
        {
            return Err(RepositoryError::UniqueViolation(
                "reception_one_open_per_pvz".to_string(),
            ));
        }

        state.receptions.push(reception.clone());
        Ok(())
    }

    async fn find_open_by_point(
        &self,
        pvz_id: PvzId,
    ) -> Result<Option<Reception>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .receptions
            .iter()
            .rev()
            .find(|r| r.pvz_id() == pvz_id && r.is_open())
            .cloned())
    }

    async fn close(&self, reception_id: ReceptionId) -> Result<Option<Reception>, RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(reception) = state
            .receptions
            .iter_mut()
            .find(|r| r.id() == reception_id && r.is_open())
        else {
            return Ok(None);
        };

        reception
            .close()
            .map_err(|e| RepositoryError::OperationFailed(e.to_string()))?;
        Ok(Some(reception.clone()))
    }

    async fn find_by_point(&self, pvz_id: PvzId) -> Result<Vec<Reception>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .receptions
            .iter()
            .rev()
            .filter(|r| r.pvz_id() == pvz_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn insert_into_open(&self, product: &Product) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let reception_id = product.reception_id();

        if !state.receptions.iter().any(|r| r.id() == reception_id) {
            return Err(RepositoryError::ForeignKeyViolation(
                "product_reception_id_fkey".to_string(),
            ));
        }
        if !state.has_open_reception(reception_id) {
            return Ok(false);
        }

        state.products.push(product.clone());
        Ok(true)
    }

    async fn find_last_by_reception(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .iter()
            .rev()
            .find(|p| p.reception_id() == reception_id)
            .cloned())
    }

    async fn delete(
        &self,
        product_id: ProductId,
        reception_id: ReceptionId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.has_open_reception(reception_id) {
            return Ok(false);
        }

        match state
            .products
            .iter()
            .position(|p| p.id() == product_id && p.reception_id() == reception_id)
        {
            Some(index) => {
                state.products.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_reception(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .iter()
            .rev()
            .filter(|p| p.reception_id() == reception_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().any(|u| u.email() == email))
    }

    async fn insert(&self, user: &UserAccount) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email() == user.email()) {
            return Err(RepositoryError::UniqueViolation(
                "users_email_key".to_string(),
            ));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email() == email).cloned())
    }
}
