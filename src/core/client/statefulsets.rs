use crate::core::repository::CrudRepository;
use crate::crds::CraftStatefulSet;

/// Repository over [`CraftStatefulSet`] resources; the generic CRUD surface
/// is the whole API.
pub type CraftStatefulSets = CrudRepository<CraftStatefulSet>;
