//! Run identifier generation.

use uuid::Uuid;

/// Generates a fresh run identifier (UUID v4).
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}
