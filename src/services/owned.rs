//! Synchronising owned child collections by id.
//!
//! A write payload lists the children it wants to keep. Entries carrying an
//! `id` update that row, entries without one are created in payload order,
//! and rows the payload no longer mentions are deleted. An `id` the owner
//! does not own rejects the whole write.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use tracing::debug;

use crate::errors::ServiceError;
use crate::i18n::Language;

/// What a sync will do, computed before anything is written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// `(payload index, existing id)`
    pub update: Vec<(usize, i64)>,
    /// payload indexes of new rows
    pub create: Vec<usize>,
    pub delete: Vec<i64>,
}

/// Fails with the first referenced id that is not among `existing`, or that
/// is referenced twice.
pub fn plan_sync(existing: &[i64], incoming: &[Option<i64>]) -> Result<SyncPlan, i64> {
    let owned: HashSet<i64> = existing.iter().copied().collect();
    let mut kept = HashSet::new();
    let mut plan = SyncPlan::default();

    for (index, id) in incoming.iter().enumerate() {
        match id {
            Some(id) if owned.contains(id) && kept.insert(*id) => plan.update.push((index, *id)),
            Some(id) => return Err(*id),
            None => plan.create.push(index),
        }
    }
    plan.delete = existing
        .iter()
        .copied()
        .filter(|id| !kept.contains(id))
        .collect();
    Ok(plan)
}

/// A payload entry for one owned row
pub trait OwnedEntry: Send + Sync {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send;

    fn id(&self) -> Option<i64>;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn owner_column() -> <Self::Entity as EntityTrait>::Column;

    fn model_id(model: &<Self::Entity as EntityTrait>::Model) -> i64;

    /// Writes the entry's fields (and the owner link) into the active model.
    /// Flat bilingual keys land in the `lang` slot.
    fn apply(&self, model: &mut Self::ActiveModel, owner_id: i64, lang: Language);
}

/// Applies `entries` to the rows owned by `owner_id`. Returns the stored ids
/// in payload order.
pub async fn sync<C, T>(
    db: &C,
    field: &'static str,
    owner_id: i64,
    entries: &[T],
    lang: Language,
) -> Result<Vec<i64>, ServiceError>
where
    C: ConnectionTrait,
    T: OwnedEntry,
    <T::Entity as EntityTrait>::Model: IntoActiveModel<T::ActiveModel> + Send,
{
    let mut existing = <T::Entity as EntityTrait>::find()
        .filter(T::owner_column().eq(owner_id))
        .order_by_asc(T::id_column())
        .all(db)
        .await?;
    let existing_ids: Vec<i64> = existing.iter().map(T::model_id).collect();
    let incoming: Vec<Option<i64>> = entries.iter().map(|e| e.id()).collect();

    let plan = plan_sync(&existing_ids, &incoming).map_err(|id| {
        ServiceError::invalid_field(field, format!("ID {} does not belong to this record", id))
    })?;

    if !plan.delete.is_empty() {
        <T::Entity as EntityTrait>::delete_many()
            .filter(T::id_column().is_in(plan.delete.clone()))
            .exec(db)
            .await?;
    }

    let mut stored = vec![0_i64; entries.len()];
    for (index, id) in &plan.update {
        let position = existing
            .iter()
            .position(|m| T::model_id(m) == *id)
            .ok_or_else(|| ServiceError::InternalError(format!("row {} vanished", id)))?;
        let mut active = existing.swap_remove(position).into_active_model();
        entries[*index].apply(&mut active, owner_id, lang);
        active.update(db).await?;
        stored[*index] = *id;
    }
    for index in &plan.create {
        let mut active = <T::ActiveModel as ActiveModelBehavior>::new();
        entries[*index].apply(&mut active, owner_id, lang);
        let model = active.insert(db).await?;
        stored[*index] = T::model_id(&model);
    }

    debug!(
        field,
        owner_id,
        updated = plan.update.len(),
        created = plan.create.len(),
        deleted = plan.delete.len(),
        "synced owned rows"
    );
    Ok(stored)
}
