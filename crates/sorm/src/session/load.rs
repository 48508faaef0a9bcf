use super::Session;
use crate::builder::build_select;
use crate::client::Executor;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::primary::is_valid;
use crate::state::capture_snapshot;
use crate::value::Value;
use tracing::{debug, trace, warn};

impl<C: Executor> Session<C> {
    /// Load the first row where `column = value` into `entity`.
    ///
    /// Returns `Ok(false)` when no row matches or the loaded primary key is not set.
    /// Columns without a matching field are ignored, `NULL` leaves a field untouched and
    /// values that do not fit a field are skipped. Relation fields are loaded recursively
    /// by the related entity's primary key. A snapshot is captured on success.
    pub async fn load_entity<T: Entity, V: Into<Value>>(
        &self,
        entity: &mut T,
        column: &str,
        value: V,
    ) -> OrmResult<bool> {
        self.load_nested(entity, column, value.into(), 0).await
    }

    /// Load the row whose primary key equals `value`.
    pub async fn load_by_primary<T: Entity, V: Into<Value>>(
        &self,
        entity: &mut T,
        value: V,
    ) -> OrmResult<bool> {
        let desc = T::descriptor();
        let pk = desc
            .primary_column()
            .ok_or(OrmError::InvalidPrimary(desc.type_name))?;
        self.load_nested(entity, pk, value.into(), 0).await
    }

    /// Load a related entity by its primary key. Called by derived `Entity::load_relation`.
    #[doc(hidden)]
    pub async fn load_related<T: Entity>(
        &self,
        entity: &mut T,
        key: Value,
        depth: usize,
    ) -> OrmResult<bool> {
        let desc = T::descriptor();
        if depth > self.config.max_depth {
            warn!(
                target: "sorm",
                entity = desc.type_name,
                depth,
                "relation depth limit reached; related entity not loaded",
            );
            return Ok(false);
        }
        let Some(pk) = desc.primary_column() else {
            return Ok(false);
        };
        self.load_nested(entity, pk, key, depth).await
    }

    async fn load_nested<T: Entity>(
        &self,
        entity: &mut T,
        column: &str,
        value: Value,
        depth: usize,
    ) -> OrmResult<bool> {
        let desc = T::descriptor();
        let stmt = build_select(desc, column, value, &self.config)?;

        debug!(
            target: "sorm.sql",
            entity = desc.type_name,
            query_type = ?stmt.kind,
            param_count = stmt.params.len(),
            sql = %stmt.sql,
        );
        let rows = match self.client.query(&stmt.sql, &stmt.params).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    target: "sorm",
                    entity = desc.type_name,
                    sql = %stmt.sql,
                    error = %err,
                    "load failed",
                );
                return Err(err);
            }
        };

        let Some(row) = rows.into_first() else {
            return Ok(false);
        };

        for (column, value) in row {
            let Some(index) = desc.field_by_column(&column) else {
                trace!(
                    target: "sorm",
                    entity = desc.type_name,
                    column = %column,
                    "no field for column",
                );
                continue;
            };
            if value.is_null() {
                continue;
            }
            if desc.fields[index].is_relation() {
                entity.load_relation(self, index, value, depth + 1).await?;
            } else if !entity.assign_field(index, value) {
                debug!(
                    target: "sorm",
                    entity = desc.type_name,
                    column = %column,
                    "value does not fit field; left unchanged",
                );
            }
        }

        if !is_valid(entity) {
            return Ok(false);
        }

        capture_snapshot(entity);
        Ok(true)
    }
}
