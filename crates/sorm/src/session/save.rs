use super::Session;
use crate::builder::{build_insert, build_update};
use crate::client::Executor;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::primary::{is_valid, set_primary};
use crate::state::capture_snapshot;
use tracing::{debug, trace, warn};

/// What a save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// An INSERT ran; `id` is the generated key applied to the primary field.
    Inserted { id: Option<i64> },
    /// An UPDATE ran for the listed fields.
    Updated { fields: Vec<&'static str> },
    /// No field of this entity changed, so no statement was executed for it.
    Unchanged,
}

impl<C: Executor> Session<C> {
    /// Persist an entity.
    ///
    /// Entities without a valid primary key or without a snapshot are inserted; all
    /// others are updated with the fields that changed since the last load or save.
    ///
    /// Related entities with a primary field are saved first: all of them before an
    /// INSERT, and before an UPDATE only those that are unsaved or were swapped in since
    /// the snapshot. Edits made inside an already saved related entity need their own
    /// `save`. On failure the error is logged and returned, and the entity's snapshot and
    /// primary key are left untouched.
    pub async fn save<T: Entity>(&self, entity: &mut T) -> OrmResult<SaveOutcome> {
        self.save_nested(entity, 0).await
    }

    /// Save at a given relation depth. Called by derived `Entity::save_relations`.
    #[doc(hidden)]
    pub async fn save_nested<T: Entity>(
        &self,
        entity: &mut T,
        depth: usize,
    ) -> OrmResult<SaveOutcome> {
        let desc = T::descriptor();
        if depth > self.config.max_depth {
            return Err(OrmError::DepthExceeded {
                entity: desc.type_name,
                depth,
            });
        }
        if entity.persist_state().is_deleted() {
            return Err(OrmError::Deleted(desc.type_name));
        }

        entity.save_relations(self, depth + 1).await?;

        let was_valid = is_valid(entity);
        let insert = !was_valid || !entity.persist_state().has_snapshot();
        let stmt = if insert {
            build_insert(entity, &self.config)
        } else {
            build_update(entity, &self.config)?
        };
        let Some(stmt) = stmt else {
            trace!(target: "sorm", entity = desc.type_name, "nothing to save");
            return Ok(SaveOutcome::Unchanged);
        };

        debug!(
            target: "sorm.sql",
            entity = desc.type_name,
            query_type = ?stmt.kind,
            param_count = stmt.params.len(),
            sql = %stmt.sql,
        );
        let result = if stmt.returns_key {
            self.client.execute_returning(&stmt.sql, &stmt.params).await
        } else {
            self.client.execute(&stmt.sql, &stmt.params).await
        };
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    target: "sorm",
                    entity = desc.type_name,
                    sql = %stmt.sql,
                    params = ?stmt.params,
                    error = %err,
                    "save failed",
                );
                return Err(err);
            }
        };

        let outcome = if insert {
            let mut id = None;
            if !was_valid && desc.primary_index().is_some() {
                if let Some(new_id) = result.last_insert_id.filter(|&n| n != 0) {
                    set_primary(entity, new_id)?;
                    id = Some(new_id);
                }
            }
            SaveOutcome::Inserted { id }
        } else {
            SaveOutcome::Updated {
                fields: stmt.fields,
            }
        };

        capture_snapshot(entity);
        Ok(outcome)
    }
}
