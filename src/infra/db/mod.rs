//! Shop database handle: pool setup, schema migrations and liveness.

use std::collections::HashSet;

use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Pooled connection to the `users` and `sweets` store.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the configured database and bring its schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        Self::connect_with(ConnectOptions::new(config.database_url.clone())).await
    }

    /// Like [`Database::connect`], with caller-chosen pool options.
    pub async fn connect_with(options: ConnectOptions) -> Result<Self, DbErr> {
        let db = Self::open(options).await?;
        db.run_migrations().await?;
        tracing::info!(
            backend = ?db.connection.get_database_backend(),
            "Shop database ready"
        );
        Ok(db)
    }

    /// Open the configured database and leave the schema alone.
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        Self::open(ConnectOptions::new(config.database_url.clone())).await
    }

    async fn open(options: ConnectOptions) -> Result<Self, DbErr> {
        let connection = sea_orm::Database::connect(options).await?;
        Ok(Self { connection })
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Revert the newest applied migration only.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Every known migration in order, paired with whether it has been applied.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied: HashSet<String> = Migrator::get_applied_migrations(&self.connection)
            .await?
            .iter()
            .map(|migration| migration.name().to_string())
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|migration| {
                let name = migration.name().to_string();
                let done = applied.contains(&name);
                (name, done)
            })
            .collect())
    }

    /// Drop the shop tables and rebuild them from the first migration.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Round trip used by `/health`.
    pub async fn ping(&self) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await
            .map(|_| ())
    }
}
