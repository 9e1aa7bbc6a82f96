use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::{
    attribute_group_attributes, attribute_groups, attribute_set_attributes, attribute_sets,
    attributes,
};
use crate::errors::{CatalogError, CatalogResult};
use crate::services::ValidationService;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttributeSet {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttributeGroup {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAttribute {
    pub attribute: attributes::Model,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayout {
    pub group: attribute_groups::Model,
    pub attributes: Vec<LayoutAttribute>,
}

/// A set with its groups and attributes, everything in sort order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSetLayout {
    pub set: attribute_sets::Model,
    pub groups: Vec<GroupLayout>,
    pub ungrouped: Vec<LayoutAttribute>,
}

/// Composes attributes into attribute sets and groups.
#[derive(Clone)]
pub struct AttributeSetService {
    db: DatabaseConnection,
}

impl AttributeSetService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_set(&self, input: NewAttributeSet) -> CatalogResult<attribute_sets::Model> {
        let code = ValidationService::validate_code("Attribute set", &input.code)?;
        let label = ValidationService::validate_label("Attribute set label", &input.label)?;

        if self.find_set_by_code(&code).await?.is_some() {
            return Err(CatalogError::duplicate_code("AttributeSet", code));
        }

        let set = attribute_sets::ActiveModel {
            code: Set(code),
            label: Set(label),
            product_type: Set(input.product_type),
            is_default: Set(input.is_default),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created attribute set {} with id {}", set.code, set.id);
        Ok(set)
    }

    pub async fn create_group(
        &self,
        set_id: i32,
        input: NewAttributeGroup,
    ) -> CatalogResult<attribute_groups::Model> {
        self.get_set(set_id).await?;
        let code = ValidationService::validate_code("Attribute group", &input.code)?;
        let label = ValidationService::validate_label("Attribute group label", &input.label)?;

        let existing = attribute_groups::Entity::find()
            .filter(attribute_groups::Column::AttributeSetId.eq(set_id))
            .filter(attribute_groups::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CatalogError::duplicate_code("AttributeGroup", code));
        }

        let group = attribute_groups::ActiveModel {
            code: Set(code),
            label: Set(label),
            sort_order: Set(input.sort_order),
            attribute_set_id: Set(set_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created group {} in attribute set {}", group.code, set_id);
        Ok(group)
    }

    pub async fn list_sets(&self) -> CatalogResult<Vec<attribute_sets::Model>> {
        Ok(attribute_sets::Entity::find()
            .order_by_asc(attribute_sets::Column::Code)
            .all(&self.db)
            .await?)
    }

    pub async fn get_set(&self, id: i32) -> CatalogResult<attribute_sets::Model> {
        attribute_sets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("AttributeSet", id))
    }

    pub async fn find_set_by_code(
        &self,
        code: &str,
    ) -> CatalogResult<Option<attribute_sets::Model>> {
        Ok(attribute_sets::Entity::find()
            .filter(attribute_sets::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    async fn group_of_set(
        &self,
        set_id: i32,
        group_id: i32,
    ) -> CatalogResult<attribute_groups::Model> {
        let group = attribute_groups::Entity::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("AttributeGroup", group_id))?;

        if group.attribute_set_id != set_id {
            return Err(CatalogError::Validation(format!(
                "Attribute group {} does not belong to attribute set {}",
                group_id, set_id
            )));
        }
        Ok(group)
    }

    async fn group_ids(&self, set_id: i32) -> CatalogResult<Vec<i32>> {
        Ok(attribute_groups::Entity::find()
            .filter(attribute_groups::Column::AttributeSetId.eq(set_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|group| group.id)
            .collect())
    }

    async fn flat_assignment(
        &self,
        set_id: i32,
        attribute_id: i32,
    ) -> CatalogResult<Option<attribute_set_attributes::Model>> {
        Ok(attribute_set_attributes::Entity::find()
            .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_attributes::Column::AttributeId.eq(attribute_id))
            .one(&self.db)
            .await?)
    }

    async fn grouped_assignment(
        &self,
        set_id: i32,
        attribute_id: i32,
    ) -> CatalogResult<Option<attribute_group_attributes::Model>> {
        let group_ids = self.group_ids(set_id).await?;
        if group_ids.is_empty() {
            return Ok(None);
        }
        Ok(attribute_group_attributes::Entity::find()
            .filter(attribute_group_attributes::Column::AttributeGroupId.is_in(group_ids))
            .filter(attribute_group_attributes::Column::AttributeId.eq(attribute_id))
            .one(&self.db)
            .await?)
    }

    /// Assign an attribute to a set, inside `group_id` when given.
    ///
    /// An attribute appears at most once per set, grouped or not.
    pub async fn assign_attribute_to_set(
        &self,
        set_id: i32,
        attribute_id: i32,
        sort_order: i32,
        group_id: Option<i32>,
    ) -> CatalogResult<()> {
        self.get_set(set_id).await?;
        attributes::Entity::find_by_id(attribute_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Attribute", attribute_id))?;

        if self.flat_assignment(set_id, attribute_id).await?.is_some()
            || self.grouped_assignment(set_id, attribute_id).await?.is_some()
        {
            return Err(CatalogError::DuplicateAssignment {
                attribute_id,
                set_id,
            });
        }

        match group_id {
            Some(group_id) => {
                self.group_of_set(set_id, group_id).await?;
                attribute_group_attributes::ActiveModel {
                    attribute_group_id: Set(group_id),
                    attribute_id: Set(attribute_id),
                    sort_order: Set(sort_order),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                info!(
                    "Assigned attribute {} to group {} of set {}",
                    attribute_id, group_id, set_id
                );
            }
            None => {
                attribute_set_attributes::ActiveModel {
                    attribute_set_id: Set(set_id),
                    attribute_id: Set(attribute_id),
                    sort_order: Set(sort_order),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                info!("Assigned attribute {} to set {}", attribute_id, set_id);
            }
        }

        Ok(())
    }

    /// Remove an attribute from the set, wherever it sits.
    pub async fn unassign_attribute(&self, set_id: i32, attribute_id: i32) -> CatalogResult<()> {
        if let Some(flat) = self.flat_assignment(set_id, attribute_id).await? {
            attribute_set_attributes::Entity::delete_by_id(flat.id)
                .exec(&self.db)
                .await?;
        } else if let Some(grouped) = self.grouped_assignment(set_id, attribute_id).await? {
            attribute_group_attributes::Entity::delete_by_id(grouped.id)
                .exec(&self.db)
                .await?;
        } else {
            return Err(CatalogError::not_found(
                "AttributeAssignment",
                format!("{}/{}", set_id, attribute_id),
            ));
        }

        info!("Unassigned attribute {} from set {}", attribute_id, set_id);
        Ok(())
    }

    /// Rewrite sort orders of the flat list, or of `group_id`, to follow
    /// `ordered_attribute_ids` (0..n). The list must name every assignment
    /// in that scope exactly once.
    pub async fn reorder(
        &self,
        set_id: i32,
        group_id: Option<i32>,
        ordered_attribute_ids: &[i32],
    ) -> CatalogResult<()> {
        self.get_set(set_id).await?;

        let mut seen = HashSet::new();
        for id in ordered_attribute_ids {
            if !seen.insert(*id) {
                return Err(CatalogError::Validation(format!(
                    "Attribute {} appears more than once in the reorder list",
                    id
                )));
            }
        }

        if let Some(group_id) = group_id {
            self.group_of_set(set_id, group_id).await?;
        }

        let txn = self.db.begin().await?;
        match group_id {
            Some(group_id) => {
                let rows = attribute_group_attributes::Entity::find()
                    .filter(attribute_group_attributes::Column::AttributeGroupId.eq(group_id))
                    .all(&txn)
                    .await?;
                let by_attribute: HashMap<i32, attribute_group_attributes::Model> =
                    rows.into_iter().map(|row| (row.attribute_id, row)).collect();
                check_reorder_scope(by_attribute.keys().copied(), ordered_attribute_ids)?;

                for (position, attribute_id) in ordered_attribute_ids.iter().enumerate() {
                    if let Some(row) = by_attribute.get(attribute_id) {
                        let mut active: attribute_group_attributes::ActiveModel =
                            row.clone().into();
                        active.sort_order = Set(position as i32);
                        active.update(&txn).await?;
                    }
                }
            }
            None => {
                let rows = attribute_set_attributes::Entity::find()
                    .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
                    .all(&txn)
                    .await?;
                let by_attribute: HashMap<i32, attribute_set_attributes::Model> =
                    rows.into_iter().map(|row| (row.attribute_id, row)).collect();
                check_reorder_scope(by_attribute.keys().copied(), ordered_attribute_ids)?;

                for (position, attribute_id) in ordered_attribute_ids.iter().enumerate() {
                    if let Some(row) = by_attribute.get(attribute_id) {
                        let mut active: attribute_set_attributes::ActiveModel = row.clone().into();
                        active.sort_order = Set(position as i32);
                        active.update(&txn).await?;
                    }
                }
            }
        }
        txn.commit().await?;

        info!(
            "Reordered {} attribute(s) in set {}",
            ordered_attribute_ids.len(),
            set_id
        );
        Ok(())
    }

    pub async fn layout(&self, set_id: i32) -> CatalogResult<AttributeSetLayout> {
        let set = self.get_set(set_id).await?;

        let groups = attribute_groups::Entity::find()
            .filter(attribute_groups::Column::AttributeSetId.eq(set_id))
            .order_by_asc(attribute_groups::Column::SortOrder)
            .order_by_asc(attribute_groups::Column::Id)
            .all(&self.db)
            .await?;
        let group_ids: Vec<i32> = groups.iter().map(|group| group.id).collect();

        let flat_rows = attribute_set_attributes::Entity::find()
            .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
            .order_by_asc(attribute_set_attributes::Column::SortOrder)
            .order_by_asc(attribute_set_attributes::Column::Id)
            .all(&self.db)
            .await?;
        let grouped_rows = if group_ids.is_empty() {
            Vec::new()
        } else {
            attribute_group_attributes::Entity::find()
                .filter(attribute_group_attributes::Column::AttributeGroupId.is_in(group_ids))
                .order_by_asc(attribute_group_attributes::Column::SortOrder)
                .order_by_asc(attribute_group_attributes::Column::Id)
                .all(&self.db)
                .await?
        };

        let attribute_ids: Vec<i32> = flat_rows
            .iter()
            .map(|row| row.attribute_id)
            .chain(grouped_rows.iter().map(|row| row.attribute_id))
            .collect();
        let attributes_by_id: HashMap<i32, attributes::Model> = if attribute_ids.is_empty() {
            HashMap::new()
        } else {
            attributes::Entity::find()
                .filter(attributes::Column::Id.is_in(attribute_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|attribute| (attribute.id, attribute))
                .collect()
        };

        let ungrouped = flat_rows
            .iter()
            .filter_map(|row| {
                attributes_by_id.get(&row.attribute_id).map(|attribute| LayoutAttribute {
                    attribute: attribute.clone(),
                    sort_order: row.sort_order,
                })
            })
            .collect();

        let groups = groups
            .into_iter()
            .map(|group| {
                let attributes = grouped_rows
                    .iter()
                    .filter(|row| row.attribute_group_id == group.id)
                    .filter_map(|row| {
                        attributes_by_id.get(&row.attribute_id).map(|attribute| LayoutAttribute {
                            attribute: attribute.clone(),
                            sort_order: row.sort_order,
                        })
                    })
                    .collect();
                GroupLayout { group, attributes }
            })
            .collect();

        Ok(AttributeSetLayout {
            set,
            groups,
            ungrouped,
        })
    }
}

/// `ordered` must be a permutation of `assigned`.
fn check_reorder_scope(
    assigned: impl Iterator<Item = i32>,
    ordered: &[i32],
) -> CatalogResult<()> {
    let assigned: HashSet<i32> = assigned.collect();

    if let Some(unknown) = ordered.iter().find(|id| !assigned.contains(id)) {
        return Err(CatalogError::Validation(format!(
            "Attribute {} is not assigned to this scope",
            unknown
        )));
    }

    let mut missing: Vec<i32> = assigned
        .iter()
        .filter(|id| !ordered.contains(id))
        .copied()
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(CatalogError::IncompleteSet { missing });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reorder_scope_accepts_permutation() {
        assert!(check_reorder_scope([1, 2, 3].into_iter(), &[3, 1, 2]).is_ok());
        assert!(check_reorder_scope(std::iter::empty(), &[]).is_ok());
    }

    #[test]
    fn test_check_reorder_scope_reports_missing() {
        match check_reorder_scope([1, 2, 3].into_iter(), &[2]) {
            Err(CatalogError::IncompleteSet { missing }) => assert_eq!(missing, vec![1, 3]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_reorder_scope_rejects_unknown() {
        let err = check_reorder_scope([1, 2].into_iter(), &[1, 2, 9]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
