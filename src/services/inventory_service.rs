//! Inventory service - catalog management, purchase and restock.
//!
//! Every operation takes the caller's verified `Identity`. Admin-only
//! operations check the role before touching persistence.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    require_role, Identity, NewSweet, RestockAmount, Role, Sweet, SweetChanges, SweetFilter,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Inventory service trait for dependency injection.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Add a sweet to the catalog (admin)
    async fn create_sweet(&self, identity: &Identity, sweet: NewSweet) -> AppResult<Sweet>;

    async fn list_sweets(&self, identity: &Identity) -> AppResult<Vec<Sweet>>;

    async fn get_sweet(&self, identity: &Identity, id: i32) -> AppResult<Sweet>;

    /// Conjunction of the supplied filters; an empty filter lists everything
    async fn search_sweets(&self, identity: &Identity, filter: SweetFilter) -> AppResult<Vec<Sweet>>;

    /// Apply a partial edit (admin)
    async fn update_sweet(&self, identity: &Identity, id: i32, changes: SweetChanges) -> AppResult<Sweet>;

    /// Permanently remove a sweet (admin)
    async fn delete_sweet(&self, identity: &Identity, id: i32) -> AppResult<()>;

    /// Buy one unit
    async fn purchase_sweet(&self, identity: &Identity, id: i32) -> AppResult<Sweet>;

    /// Add stock (admin)
    async fn restock_sweet(&self, identity: &Identity, id: i32, amount: RestockAmount) -> AppResult<Sweet>;
}

/// Concrete implementation of InventoryService using Unit of Work.
pub struct Inventory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Inventory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> InventoryService for Inventory<U> {
    async fn create_sweet(&self, identity: &Identity, sweet: NewSweet) -> AppResult<Sweet> {
        require_role(identity, Role::Admin)?;

        let sweet = self.uow.sweets().create(sweet).await?;
        tracing::info!(sweet_id = sweet.id, admin_id = identity.id, "Sweet created");
        Ok(sweet)
    }

    async fn list_sweets(&self, _identity: &Identity) -> AppResult<Vec<Sweet>> {
        self.uow.sweets().list().await
    }

    async fn get_sweet(&self, _identity: &Identity, id: i32) -> AppResult<Sweet> {
        self.uow.sweets().find_by_id(id).await?.ok_or_not_found()
    }

    async fn search_sweets(&self, _identity: &Identity, filter: SweetFilter) -> AppResult<Vec<Sweet>> {
        if filter.is_empty() {
            return self.uow.sweets().list().await;
        }
        self.uow.sweets().search(&filter).await
    }

    async fn update_sweet(&self, identity: &Identity, id: i32, changes: SweetChanges) -> AppResult<Sweet> {
        require_role(identity, Role::Admin)?;
        changes.validate()?;

        let sweet = self.uow.sweets().update(id, changes).await?;
        tracing::info!(sweet_id = sweet.id, admin_id = identity.id, "Sweet updated");
        Ok(sweet)
    }

    async fn delete_sweet(&self, identity: &Identity, id: i32) -> AppResult<()> {
        require_role(identity, Role::Admin)?;

        self.uow.sweets().delete(id).await?;
        tracing::info!(sweet_id = id, admin_id = identity.id, "Sweet deleted");
        Ok(())
    }

    async fn purchase_sweet(&self, identity: &Identity, id: i32) -> AppResult<Sweet> {
        match self.uow.sweets().purchase(id).await {
            Ok(sweet) => {
                tracing::info!(
                    sweet_id = id,
                    account_id = identity.id,
                    remaining = sweet.quantity,
                    "Sweet purchased"
                );
                Ok(sweet)
            }
            Err(AppError::OutOfStock) => {
                tracing::debug!(sweet_id = id, account_id = identity.id, "Purchase rejected: out of stock");
                Err(AppError::OutOfStock)
            }
            Err(e) => Err(e),
        }
    }

    async fn restock_sweet(&self, identity: &Identity, id: i32, amount: RestockAmount) -> AppResult<Sweet> {
        require_role(identity, Role::Admin)?;

        let sweet = self.uow.sweets().restock(id, amount).await?;
        tracing::info!(
            sweet_id = id,
            admin_id = identity.id,
            amount = amount.get(),
            quantity = sweet.quantity,
            "Sweet restocked"
        );
        Ok(sweet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        AccountRepository, MockAccountRepository, MockSweetRepository, SweetRepository,
        TransactionContext,
    };
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    struct MockUow {
        sweets: Arc<MockSweetRepository>,
    }

    #[async_trait]
    impl UnitOfWork for MockUow {
        fn accounts(&self) -> Arc<dyn AccountRepository> {
            Arc::new(MockAccountRepository::new())
        }

        fn sweets(&self) -> Arc<dyn SweetRepository> {
            self.sweets.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("transactions are not available in unit tests"))
        }
    }

    fn inventory(sweets: MockSweetRepository) -> Inventory<MockUow> {
        Inventory::new(Arc::new(MockUow {
            sweets: Arc::new(sweets),
        }))
    }

    fn identity(role: Role) -> Identity {
        Identity {
            id: 9,
            email: "someone@x.com".into(),
            role,
        }
    }

    fn ladoo(quantity: i32) -> Sweet {
        Sweet {
            id: 1,
            name: "Ladoo".into(),
            category: "Indian".into(),
            price: Decimal::new(250, 2),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_admin_operations_forbidden_for_users_without_touching_storage() {
        // No expectations: any repository call would panic
        let service = inventory(MockSweetRepository::new());
        let user = identity(Role::User);

        let new_sweet = NewSweet::new("Ladoo", "Indian", Decimal::ONE, 1).unwrap();
        assert!(matches!(
            service.create_sweet(&user, new_sweet).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service.update_sweet(&user, 1, SweetChanges::default()).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(service.delete_sweet(&user, 1).await, Err(AppError::Forbidden)));
        assert!(matches!(
            service
                .restock_sweet(&user, 1, RestockAmount::new(5).unwrap())
                .await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_admin_can_create() {
        let mut repo = MockSweetRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|new| {
                Ok(Sweet {
                    id: 1,
                    name: new.name,
                    category: new.category,
                    price: new.price,
                    quantity: new.quantity,
                })
            });

        let service = inventory(repo);
        let new_sweet = NewSweet::new("Ladoo", "Indian", Decimal::new(250, 2), 3).unwrap();
        let created = service.create_sweet(&identity(Role::Admin), new_sweet).await.unwrap();

        assert_eq!(created, ladoo(3));
    }

    #[tokio::test]
    async fn test_empty_search_lists_everything() {
        let mut repo = MockSweetRepository::new();
        repo.expect_list().times(1).returning(|| Ok(vec![ladoo(3)]));
        repo.expect_search().never();

        let service = inventory(repo);
        let found = service
            .search_sweets(&identity(Role::User), SweetFilter::default())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_sweet_is_not_found() {
        let mut repo = MockSweetRepository::new();
        repo.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

        let service = inventory(repo);
        assert!(matches!(
            service.get_sweet(&identity(Role::User), 42).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_purchase_passes_out_of_stock_through() {
        let mut repo = MockSweetRepository::new();
        repo.expect_purchase()
            .with(eq(1))
            .returning(|_| Err(AppError::OutOfStock));

        let service = inventory(repo);
        assert!(matches!(
            service.purchase_sweet(&identity(Role::User), 1).await,
            Err(AppError::OutOfStock)
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_negative_price_before_storage() {
        let service = inventory(MockSweetRepository::new());
        let changes = SweetChanges {
            price: Some(Decimal::new(-1, 0)),
            ..Default::default()
        };

        assert!(matches!(
            service.update_sweet(&identity(Role::Admin), 1, changes).await,
            Err(AppError::Validation(_))
        ));
    }
}
