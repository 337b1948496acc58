use serde::{Deserialize, Serialize};

/// Identifies a facility definition in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityTypeId(pub u32);

/// Identifies a placed facility.
///
/// Assigned monotonically by the store and never reused after removal, so a
/// stale id can never silently alias a newer facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub u64);
