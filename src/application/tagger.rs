use crate::domain::badge;
use crate::ports::media::{MediaAsset, MediaStoreError, MediaStorePort};
use std::path::Path;
use tracing::info;

/// Orchestrates tag creation against the media store.
///
/// Stateless: uploads the two photos, builds the overlay chain from the
/// returned public ids, and asks the store for the badge-frame delivery URL.
pub struct TagService<M> {
    store: M,
    /// Short public id of the badge-frame template asset.
    frame_id: String,
}

impl<M> TagService<M>
where
    M: MediaStorePort,
{
    pub fn new(store: M, frame_id: impl Into<String>) -> Self {
        Self {
            store,
            frame_id: frame_id.into(),
        }
    }

    /// Upload both photos and return the composite tag URL.
    ///
    /// Uploads happen in layer order: "then" photo first, "now" photo second.
    pub async fn create_tag(
        &self,
        name: &str,
        then_path: &Path,
        now_path: &Path,
    ) -> Result<String, MediaStoreError> {
        let then_asset = self.store.upload(then_path, None).await?;
        let now_asset = self.store.upload(now_path, None).await?;

        info!(
            then = %then_asset.public_id,
            now = %now_asset.public_id,
            "photos uploaded, building composite"
        );

        let chain = badge::compose_layers(&then_asset.public_id, &now_asset.public_id, name);
        Ok(self.store.delivery_url(&self.frame_id, &chain))
    }

    /// Look up an asset (used to check whether the badge frame exists).
    pub async fn badge_frame(&self, public_id: &str) -> Result<MediaAsset, MediaStoreError> {
        self.store.resource(public_id).await
    }

    /// Upload the bundled badge-frame template under the given public id.
    pub async fn seed_badge_frame(
        &self,
        public_id: &str,
        asset_path: &Path,
    ) -> Result<MediaAsset, MediaStoreError> {
        info!(id = public_id, "seeding badge frame template");
        self.store.upload(asset_path, Some(public_id)).await
    }
}
