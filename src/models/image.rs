use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Gallery image. `public_id` is the object-store handle used when the
/// file is later replaced or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub public_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Image {
    const COLLECTION: &'static str = "images";

    fn id(&self) -> Uuid {
        self.id
    }
}
