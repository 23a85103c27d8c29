use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, ProductPatch};
use crate::domain::types::{CategoryId, ProductId, ProductName, ProductPrice, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddProductFormPayload {
    pub product: NewProduct,
}

#[derive(Debug, Error)]
pub enum AddProductFormError {
    #[error("Add product form validation failed: {0}")]
    Validation(String),
    #[error("Add product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddProductForm> for AddProductFormPayload {
    type Error = AddProductFormError;

    fn try_from(value: AddProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            product: NewProduct {
                name: ProductName::new(value.name)?,
                description: value.description,
                price: ProductPrice::new(value.price)?,
                category_id: CategoryId::new(value.category_id)?,
            },
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateProductForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductFormPayload {
    pub product_id: ProductId,
    pub patch: ProductPatch,
}

#[derive(Debug, Error)]
pub enum UpdateProductFormError {
    #[error("Update product form validation failed: {0}")]
    Validation(String),
    #[error("Update product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateProductForm> for UpdateProductFormPayload {
    type Error = UpdateProductFormError;

    fn try_from(value: UpdateProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            product_id: ProductId::new(value.product_id)?,
            patch: ProductPatch {
                name: value.name.map(ProductName::new).transpose()?,
                description: value.description.map(Some),
                price: value.price.map(ProductPrice::new).transpose()?,
                category_id: value.category_id.map(CategoryId::new).transpose()?,
                is_active: value.is_active,
            },
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteProductForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteProductFormPayload {
    pub product_id: ProductId,
}

#[derive(Debug, Error)]
pub enum DeleteProductFormError {
    #[error("Delete product form validation failed: {0}")]
    Validation(String),
    #[error("Delete product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for DeleteProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for DeleteProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<DeleteProductForm> for DeleteProductFormPayload {
    type Error = DeleteProductFormError;

    fn try_from(value: DeleteProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            product_id: ProductId::new(value.product_id)?,
        })
    }
}
