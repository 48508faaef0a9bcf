use super::Session;
use crate::builder::build_delete;
use crate::client::Executor;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::primary::is_valid;
use tracing::{debug, warn};

impl<C: Executor> Session<C> {
    /// Delete the entity's row by primary key and mark the entity deleted.
    ///
    /// Returns the number of affected rows. Deleted entities refuse further saves.
    pub async fn delete<T: Entity>(&self, entity: &mut T) -> OrmResult<u64> {
        let desc = T::descriptor();
        if !is_valid(entity) {
            return Err(OrmError::NotPersisted(desc.type_name));
        }

        let stmt = build_delete(entity, &self.config)?;
        debug!(
            target: "sorm.sql",
            entity = desc.type_name,
            query_type = ?stmt.kind,
            param_count = stmt.params.len(),
            sql = %stmt.sql,
        );
        let result = match self.client.execute(&stmt.sql, &stmt.params).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    target: "sorm",
                    entity = desc.type_name,
                    sql = %stmt.sql,
                    error = %err,
                    "delete failed",
                );
                return Err(err);
            }
        };

        entity.persist_state_mut().mark_deleted();
        Ok(result.rows_affected)
    }
}
