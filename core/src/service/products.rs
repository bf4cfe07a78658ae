// crm-core/src/service/products.rs

use tracing::instrument;

use crate::batch::{self, ApplyFuture};
use crate::error::CoreResult;
use crate::model::{NewProduct, Product};
use crate::repository::Repository;
use crate::service::Crm;
use crate::validate;

impl Crm {
  /// Creates one product, or persists nothing.
  #[instrument(skip(self, draft), fields(name = %draft.name), err(Display))]
  pub async fn create_product(&self, draft: NewProduct) -> CoreResult<Product> {
    batch::run_single(&*self.repo, draft, apply_product).await
  }

  pub async fn list_products(&self) -> CoreResult<Vec<Product>> {
    self.repo.list_products().await
  }
}

fn apply_product(repo: &dyn Repository, draft: NewProduct) -> ApplyFuture<'_, Product> {
  Box::pin(async move {
    validate::validate_product(&draft)?;
    repo.insert_product(draft).await
  })
}
