use serde::{Deserialize, Serialize};

/// One inspectable line from the checklist template.
///
/// Created once by the loader and immutable for the rest of the run. `id` is
/// derived from the row's position inside the template window, so the same
/// template always yields the same ids; downstream lookups never re-parse the
/// template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    /// Enumeration order over included rows. Strictly increasing; also the
    /// item's row offset inside the report's result block.
    pub sequence_index: u32,
    pub category: String,
    pub description: String,
}
