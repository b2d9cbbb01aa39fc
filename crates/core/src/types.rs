/// Company primary keys are opaque UUID strings assigned by the store.
pub type DbId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
