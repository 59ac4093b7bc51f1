//! All-or-nothing bulk write of an accepted batch.

use geoloc_core::geolocation::ValidatedRow;
use geoloc_db::models::geolocation::NewGeolocation;
use geoloc_db::repositories::GeolocationRepo;
use geoloc_db::DbPool;

use crate::error::LoadError;

/// Callback run against the mapped entities of a write.
pub type WriteHook<'a> = Box<dyn Fn(&[NewGeolocation]) -> Result<(), String> + Send + Sync + 'a>;

/// Optional callbacks around a bulk write, passed per call.
///
/// `before_write` runs inside the transaction before the copy starts;
/// `after_write` runs once every row has been copied, before commit. A hook
/// returning `Err` rolls the whole write back.
#[derive(Default)]
pub struct WriteHooks<'a> {
    pub before_write: Option<WriteHook<'a>>,
    pub after_write: Option<WriteHook<'a>>,
}

impl<'a> WriteHooks<'a> {
    pub fn before_write(
        mut self,
        hook: impl Fn(&[NewGeolocation]) -> Result<(), String> + Send + Sync + 'a,
    ) -> Self {
        self.before_write = Some(Box::new(hook));
        self
    }

    pub fn after_write(
        mut self,
        hook: impl Fn(&[NewGeolocation]) -> Result<(), String> + Send + Sync + 'a,
    ) -> Self {
        self.after_write = Some(Box::new(hook));
        self
    }
}

/// Write `rows` in a single transaction and return how many were stored.
///
/// An empty batch returns `Ok(0)` without opening a transaction, touching
/// the pool, or running hooks. Rows are trusted to be validated and unique;
/// no checks happen here beyond what the store enforces.
pub async fn load(
    pool: &DbPool,
    rows: Vec<ValidatedRow>,
    hooks: &WriteHooks<'_>,
) -> Result<u64, LoadError> {
    if rows.is_empty() {
        tracing::debug!("Empty batch, skipping bulk write");
        return Ok(0);
    }

    let entities: Vec<NewGeolocation> = rows.into_iter().map(NewGeolocation::from).collect();

    let mut tx = pool.begin().await?;

    if let Some(hook) = &hooks.before_write {
        if let Err(msg) = hook(&entities[..]) {
            rollback(tx).await;
            return Err(LoadError::Hook(msg));
        }
    }

    let copied = GeolocationRepo::copy_in(&mut *tx, &entities).await?;

    if let Some(hook) = &hooks.after_write {
        if let Err(msg) = hook(&entities[..]) {
            rollback(tx).await;
            return Err(LoadError::Hook(msg));
        }
    }

    tx.commit().await?;
    tracing::info!(rows = copied, "Bulk write committed");
    Ok(copied)
}

async fn rollback(tx: sqlx::Transaction<'_, sqlx::Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Rollback failed; connection will be discarded");
    }
}
