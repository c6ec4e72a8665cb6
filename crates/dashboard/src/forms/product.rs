//! Product editor: create, edit and status changes.

use seller_panel_core::{CategoryId, PriceInCents, ProductId, ProductStatus};
use tracing::instrument;

use super::{FieldErrors, FormContext, REQUIRED, SubmitResult, Submitted, Validator};
use crate::api::{Attachment, Product, ProductDraft};
use crate::error::ApiError;
use crate::navigation::{NavigationMode, Route};
use crate::upload::ImageUpload;

pub const SELECT_CATEGORY: &str = "Select a category";
pub const IMAGE_REQUIRED: &str = "Product image is required.";

/// The product's image: the one it already has, or a new file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductImage {
    Existing(Attachment),
    Upload(ImageUpload),
}

/// Values in the product editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    /// Category id as selected (a UUID string).
    pub category_id: String,
    /// Price in currency units, as typed (`"149.90"`).
    pub price: String,
    pub image: Option<ProductImage>,
}

/// A form that passed validation.
struct ValidProduct {
    title: String,
    description: String,
    category_id: CategoryId,
    price: PriceInCents,
    image: ProductImage,
}

impl ProductForm {
    /// Editor pre-filled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            category_id: product.category.id.to_string(),
            price: product.price_in_cents.to_string(),
            image: product.cover().cloned().map(ProductImage::Existing),
        }
    }

    fn validate(&self) -> Result<ValidProduct, FieldErrors> {
        let category_id = self.category_id.parse::<CategoryId>();
        let price = PriceInCents::parse_units(&self.price);

        let mut v = Validator::new();
        v.check("title", !self.title.trim().is_empty(), REQUIRED)
            .check("category_id", category_id.is_ok(), SELECT_CATEGORY)
            .check("image", self.image.is_some(), IMAGE_REQUIRED);
        if let Err(err) = &price {
            v.fail("price", capitalize(&err.to_string()));
        }
        v.finish()?;

        match (category_id, price, self.image.clone()) {
            (Ok(category_id), Ok(price), Some(image)) => Ok(ValidProduct {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                category_id,
                price,
                image,
            }),
            // Every failure above was already recorded by the validator.
            _ => Err(FieldErrors::new()),
        }
    }

    /// Validate, upload the image, create the product, and go to the list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for failures not shown to the seller (see
    /// [`crate::forms`]).
    #[instrument(skip_all, fields(title = %self.title.trim()))]
    pub async fn submit_create(&self, ctx: &FormContext) -> SubmitResult<Product> {
        let valid = match self.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(Submitted::Invalid(errors)),
        };

        let draft = match draft_with_image(ctx, valid).await {
            Ok(draft) => draft,
            Err(err) => return ctx.settle(err),
        };

        let product = match ctx.api.create_product(&draft).await {
            Ok(product) => product,
            Err(err) => return ctx.settle(err),
        };

        ctx.notifier.success("Product created successfully!");
        ctx.navigator.navigate(Route::products(), NavigationMode::Push);
        Ok(Submitted::Completed(product))
    }

    /// Validate and save changes to an existing product. A kept image is not
    /// uploaded again.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for failures not shown to the seller.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn submit_edit(&self, ctx: &FormContext, id: ProductId) -> SubmitResult<Product> {
        let valid = match self.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(Submitted::Invalid(errors)),
        };

        let draft = match draft_with_image(ctx, valid).await {
            Ok(draft) => draft,
            Err(err) => return ctx.settle(err),
        };

        let product = match ctx.api.edit_product(id, &draft).await {
            Ok(product) => product,
            Err(err) => return ctx.settle(err),
        };

        ctx.notifier.success("Product updated successfully!");
        ctx.navigator.navigate(Route::products(), NavigationMode::Push);
        Ok(Submitted::Completed(product))
    }
}

/// Resolve the image to an attachment id (uploading if needed) and build
/// the request body.
async fn draft_with_image(
    ctx: &FormContext,
    valid: ValidProduct,
) -> Result<ProductDraft, ApiError> {
    let attachment_id = match valid.image {
        ProductImage::Existing(attachment) => attachment.id,
        ProductImage::Upload(file) => {
            let uploaded = ctx.api.upload_attachments(vec![file]).await?;
            uploaded
                .first()
                .map(|a| a.id)
                .ok_or_else(|| ApiError::Unknown("upload returned no attachment".into()))?
        }
    };

    Ok(ProductDraft {
        title: valid.title,
        category_id: valid.category_id,
        description: valid.description,
        price_in_cents: valid.price,
        attachments_ids: vec![attachment_id],
    })
}

/// Editor action: mark a product sold, cancelled or available again.
///
/// Issues a single request; on success the cached product is invalidated
/// so the editor reloads it.
///
/// # Errors
///
/// Returns `ApiError` for failures not shown to the seller.
#[instrument(skip(ctx))]
pub async fn change_product_status(
    ctx: &FormContext,
    id: ProductId,
    status: ProductStatus,
) -> SubmitResult<()> {
    if let Err(err) = ctx.api.change_product_status(id, status).await {
        return ctx.settle(err);
    }

    ctx.notifier.success("Product status changed successfully!");
    Ok(Submitted::Completed(()))
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::Category;
    use crate::forms::test_support::offline_context;
    use crate::navigation::Navigator;
    use seller_panel_core::AttachmentId;

    fn upload() -> ProductImage {
        ProductImage::Upload(ImageUpload::new("lamp.png", vec![1, 2, 3]).unwrap())
    }

    fn valid() -> ProductForm {
        ProductForm {
            title: "Desk lamp".into(),
            description: "Warm light".into(),
            category_id: CategoryId::random().to_string(),
            price: "49,90".into(),
            image: Some(upload()),
        }
    }

    #[test]
    fn test_valid_form_converts_price_to_cents() {
        let valid = valid().validate().map_err(|e| e.to_string()).unwrap();
        assert_eq!(valid.price.cents(), 4990);
    }

    #[test]
    fn test_missing_image_has_specific_message() {
        let form = ProductForm {
            image: None,
            ..valid()
        };
        let errors = form.validate().err().unwrap();
        assert_eq!(errors.get("image"), Some(IMAGE_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_messages() {
        let errors = ProductForm::default().validate().err().unwrap();
        assert_eq!(errors.get("title"), Some(REQUIRED));
        assert_eq!(errors.get("category_id"), Some(SELECT_CATEGORY));
        assert_eq!(errors.get("price"), Some("Price is required"));

        let form = ProductForm {
            price: "12.345".into(),
            ..valid()
        };
        assert_eq!(
            form.validate().err().unwrap().get("price"),
            Some("Price can have at most two decimal places")
        );
    }

    #[test]
    fn test_from_product_prefills_units() {
        let attachment = Attachment {
            id: AttachmentId::random(),
            url: "http://cdn/lamp.png".into(),
        };
        let product = Product {
            id: ProductId::random(),
            title: "Desk lamp".into(),
            description: "Warm light".into(),
            price_in_cents: PriceInCents::new(14_990),
            status: ProductStatus::Available,
            owner: None,
            category: Category {
                id: CategoryId::random(),
                title: "Furniture".into(),
                slug: "furniture".into(),
            },
            attachments: vec![attachment.clone()],
        };

        let form = ProductForm::from_product(&product);
        assert_eq!(form.price, "149.90");
        assert_eq!(form.category_id, product.category.id.to_string());
        assert_eq!(form.image, Some(ProductImage::Existing(attachment)));
        assert!(form.validate().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_create_sends_nothing() {
        let (ctx, history, log) = offline_context();
        let form = ProductForm {
            image: None,
            ..valid()
        };
        let outcome = form.submit_create(&ctx).await.unwrap();
        assert_eq!(
            outcome.field_errors().unwrap().get("image"),
            Some(IMAGE_REQUIRED)
        );
        assert_eq!(history.current(), Route::sign_in());
        assert!(log.is_empty());
    }
}
