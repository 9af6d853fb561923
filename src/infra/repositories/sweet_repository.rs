//! Sweet repository implementation.
//!
//! Stock changes are single conditional UPDATE statements, so concurrent
//! purchases are serialized by the database row, never by this process.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::entities::sweet::{self, ActiveModel, Entity as SweetEntity};
use crate::domain::{NewSweet, RestockAmount, Sweet, SweetChanges, SweetFilter};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Sweet repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SweetRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Sweet>>;

    /// All sweets in id order
    async fn list(&self) -> AppResult<Vec<Sweet>>;

    /// Sweets matching every supplied criterion
    async fn search(&self, filter: &SweetFilter) -> AppResult<Vec<Sweet>>;

    async fn create(&self, sweet: NewSweet) -> AppResult<Sweet>;

    /// Apply the supplied fields only. `NotFound` for an unknown id.
    async fn update(&self, id: i32, changes: SweetChanges) -> AppResult<Sweet>;

    /// Hard delete. `NotFound` for an unknown id.
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Decrement quantity by one if it is positive.
    ///
    /// `NotFound` for an unknown id, `OutOfStock` when quantity is zero.
    async fn purchase(&self, id: i32) -> AppResult<Sweet>;

    /// Increment quantity by `amount`. `NotFound` for an unknown id.
    async fn restock(&self, id: i32, amount: RestockAmount) -> AppResult<Sweet>;
}

/// SeaORM-backed sweet repository
pub struct SweetStore {
    db: DatabaseConnection,
}

impl SweetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SweetRepository for SweetStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Sweet>> {
        let result = SweetEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Sweet::from))
    }

    async fn list(&self) -> AppResult<Vec<Sweet>> {
        let models = SweetEntity::find()
            .order_by_asc(sweet::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Sweet::from).collect())
    }

    async fn search(&self, filter: &SweetFilter) -> AppResult<Vec<Sweet>> {
        let mut query = SweetEntity::find();

        if let Some(min) = filter.min_price {
            query = query.filter(sweet::Column::Price.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(sweet::Column::Price.lte(max));
        }

        let models = query
            .order_by_asc(sweet::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        // SQL LIKE is case-insensitive on SQLite; substring matching stays in Rust
        Ok(models
            .into_iter()
            .map(Sweet::from)
            .filter(|sweet| filter.matches(sweet))
            .collect())
    }

    async fn create(&self, sweet: NewSweet) -> AppResult<Sweet> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(sweet.name),
            category: Set(sweet.category),
            price: Set(sweet.price),
            quantity: Set(sweet.quantity),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Sweet::from(model))
    }

    async fn update(&self, id: i32, changes: SweetChanges) -> AppResult<Sweet> {
        let txn = self.db.begin().await?;
        let result = apply_changes(&txn, id, changes).await;
        finish(txn, result).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = SweetEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn purchase(&self, id: i32) -> AppResult<Sweet> {
        let txn = self.db.begin().await?;
        let result = take_one(&txn, id).await;
        finish(txn, result).await
    }

    async fn restock(&self, id: i32, amount: RestockAmount) -> AppResult<Sweet> {
        let txn = self.db.begin().await?;
        let result = add_stock(&txn, id, amount).await;
        finish(txn, result).await
    }
}

/// `UPDATE sweets SET quantity = quantity - 1 WHERE id = ? AND quantity > 0`
async fn take_one<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Sweet> {
    let result = SweetEntity::update_many()
        .col_expr(
            sweet::Column::Quantity,
            Expr::col(sweet::Column::Quantity).sub(1),
        )
        .filter(sweet::Column::Id.eq(id))
        .filter(sweet::Column::Quantity.gt(0))
        .exec(conn)
        .await?;

    let current = SweetEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_not_found()?;

    if result.rows_affected == 0 {
        return Err(AppError::OutOfStock);
    }

    Ok(Sweet::from(current))
}

/// `UPDATE sweets SET quantity = quantity + ? WHERE id = ? AND quantity <= i32::MAX - ?`
async fn add_stock<C: ConnectionTrait>(conn: &C, id: i32, amount: RestockAmount) -> AppResult<Sweet> {
    let result = SweetEntity::update_many()
        .col_expr(
            sweet::Column::Quantity,
            Expr::col(sweet::Column::Quantity).add(amount.get()),
        )
        .filter(sweet::Column::Id.eq(id))
        .filter(sweet::Column::Quantity.lte(i32::MAX - amount.get()))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Either the row is gone or the sum would not fit the quantity column
        SweetEntity::find_by_id(id).one(conn).await?.ok_or_not_found()?;
        return Err(AppError::validation(
            "Restock would exceed the maximum stock quantity",
        ));
    }

    SweetEntity::find_by_id(id)
        .one(conn)
        .await?
        .map(Sweet::from)
        .ok_or_not_found()
}

async fn apply_changes<C: ConnectionTrait>(conn: &C, id: i32, changes: SweetChanges) -> AppResult<Sweet> {
    let model = SweetEntity::find_by_id(id).one(conn).await?.ok_or_not_found()?;

    if changes.is_empty() {
        return Ok(Sweet::from(model));
    }

    let mut active: ActiveModel = model.into();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(category) = changes.category {
        active.category = Set(category);
    }
    if let Some(price) = changes.price {
        active.price = Set(price);
    }
    if let Some(quantity) = changes.quantity {
        active.quantity = Set(quantity);
    }

    let model = active.update(conn).await.map_err(AppError::from)?;
    Ok(Sweet::from(model))
}

/// Commit on success, roll back on error.
async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
