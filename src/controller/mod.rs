/// Controllers for the two survey screens
///
/// - Entry form, validation and location capture (entry.rs)
/// - Condition checkboxes (condition.rs)
/// - Saved entry listing (list.rs)
///
/// Controllers borrow the single `RecordStore` owned by `main`.

pub mod condition;
pub mod entry;
pub mod list;
