//! Expert profile data model.

use serde::{Deserialize, Serialize};

/// An expert predictor. Positions reference experts indirectly: a creator
/// is either the expert account itself or a user that owns an expert
/// profile, resolved at query time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpertRecord {
    /// Auto-generated expert ID.
    pub id: i64,
    /// Owning user account, when the expert profile belongs to a user.
    pub user_id: Option<i64>,
    /// Public display name.
    pub display_name: String,
}
