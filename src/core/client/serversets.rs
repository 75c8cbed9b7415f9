use crate::core::repository::CrudRepository;
use crate::crds::CraftServerSet;

/// Repository over [`CraftServerSet`] resources; the generic CRUD surface is
/// the whole API.
pub type CraftServerSets = CrudRepository<CraftServerSet>;
