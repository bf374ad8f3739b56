//! Studios, and the class types and package types each one offers.

use std::sync::Arc;

use tracing::info;

use super::Clock;
use crate::domain::class_type::ClassTypeFields;
use crate::domain::package_type::PackageTypeFields;
use crate::domain::{
    Business, BusinessId, ClassType, ClassTypeId, PackageType, PackageTypeId,
};
use crate::error::{Error, Result};
use crate::port::Store;

/// Businesses, class types and package types.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
    clock: Clock,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Register a studio with default branding.
    pub async fn create_business(&self, name: &str) -> Result<Business> {
        let business = Business::new(name, self.clock.now())?;
        self.store.insert_business(&business).await?;
        info!(business_id = %business.id, name = %business.name, "Business created");
        Ok(business)
    }

    pub async fn list_businesses(&self) -> Result<Vec<Business>> {
        self.store.list_businesses().await
    }

    async fn ensure_business(&self, business: &BusinessId) -> Result<()> {
        match self.store.get_business(business).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("business", business)),
        }
    }

    pub async fn create_class_type(
        &self,
        business: &BusinessId,
        fields: ClassTypeFields,
    ) -> Result<ClassType> {
        self.ensure_business(business).await?;
        let class_type = ClassType::create(business.clone(), fields, self.clock.now())?;
        self.store.insert_class_type(&class_type).await?;
        info!(class_type_id = %class_type.id, name = %class_type.name, "Class type created");
        Ok(class_type)
    }

    pub async fn get_class_type(&self, business: &BusinessId, id: &ClassTypeId) -> Result<ClassType> {
        self.store
            .get_class_type(business, id)
            .await?
            .ok_or_else(|| Error::not_found("class type", id))
    }

    pub async fn list_class_types(
        &self,
        business: &BusinessId,
        include_inactive: bool,
    ) -> Result<Vec<ClassType>> {
        self.store.list_class_types(business, include_inactive).await
    }

    pub async fn update_class_type(
        &self,
        business: &BusinessId,
        id: &ClassTypeId,
        fields: ClassTypeFields,
    ) -> Result<ClassType> {
        let mut class_type = self.get_class_type(business, id).await?;
        class_type.apply(fields)?;
        self.store.update_class_type(&class_type).await?;
        Ok(class_type)
    }

    pub async fn set_class_type_active(
        &self,
        business: &BusinessId,
        id: &ClassTypeId,
        active: bool,
    ) -> Result<ClassType> {
        let mut class_type = self.get_class_type(business, id).await?;
        class_type.is_active = active;
        self.store.update_class_type(&class_type).await?;
        Ok(class_type)
    }

    /// Fails with a conflict while schedules or classes still use the type.
    pub async fn delete_class_type(&self, business: &BusinessId, id: &ClassTypeId) -> Result<()> {
        if !self.store.delete_class_type(business, id).await? {
            return Err(Error::not_found("class type", id));
        }
        info!(class_type_id = %id, "Class type deleted");
        Ok(())
    }

    pub async fn create_package_type(
        &self,
        business: &BusinessId,
        fields: PackageTypeFields,
    ) -> Result<PackageType> {
        self.ensure_business(business).await?;
        self.ensure_class_types(business, fields.valid_for_class_types.as_deref())
            .await?;
        let package_type = PackageType::create(business.clone(), fields, self.clock.now())?;
        self.store.insert_package_type(&package_type).await?;
        info!(
            package_type_id = %package_type.id,
            name = %package_type.name,
            structure = package_type.structure.kind(),
            "Package type created"
        );
        Ok(package_type)
    }

    pub async fn get_package_type(
        &self,
        business: &BusinessId,
        id: &PackageTypeId,
    ) -> Result<PackageType> {
        self.store
            .get_package_type(business, id)
            .await?
            .ok_or_else(|| Error::not_found("package type", id))
    }

    pub async fn list_package_types(
        &self,
        business: &BusinessId,
        include_inactive: bool,
    ) -> Result<Vec<PackageType>> {
        self.store
            .list_package_types(business, include_inactive)
            .await
    }

    /// Replace the editable fields. Packages already sold keep the terms
    /// they were issued with.
    pub async fn update_package_type(
        &self,
        business: &BusinessId,
        id: &PackageTypeId,
        fields: PackageTypeFields,
    ) -> Result<PackageType> {
        self.ensure_class_types(business, fields.valid_for_class_types.as_deref())
            .await?;
        let mut package_type = self.get_package_type(business, id).await?;
        package_type.apply(fields)?;
        self.store.update_package_type(&package_type).await?;
        Ok(package_type)
    }

    /// Toggle availability. Returns whether existing packages reference the
    /// type; those packages are left as they are.
    pub async fn set_package_type_active(
        &self,
        business: &BusinessId,
        id: &PackageTypeId,
        active: bool,
    ) -> Result<(PackageType, bool)> {
        let mut package_type = self.get_package_type(business, id).await?;
        package_type.is_active = active;
        self.store.update_package_type(&package_type).await?;
        let in_use = self.store.package_type_in_use(business, id).await?;
        Ok((package_type, in_use))
    }

    async fn ensure_class_types(
        &self,
        business: &BusinessId,
        ids: Option<&[ClassTypeId]>,
    ) -> Result<()> {
        for id in ids.unwrap_or_default() {
            self.get_class_type(business, id).await?;
        }
        Ok(())
    }
}
