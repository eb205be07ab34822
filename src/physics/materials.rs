//! Surface materials and per-pair contact properties
//!
//! Colliders carry their material id in `user_data`. When two materials meet
//! and the pair has a registered [`ContactMaterial`], the solver contacts of
//! that pair get its friction and restitution. Unregistered pairs keep the
//! values rapier derives from the colliders themselves.

use rapier3d::prelude::*;
use rustc_hash::FxHashMap;

/// Identifier of a registered surface material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    /// Pack into collider user data; zero means "no material"
    pub(crate) fn to_user_data(self) -> u128 {
        u128::from(self.0) + 1
    }

    /// Unpack from collider user data
    pub(crate) fn from_user_data(data: u128) -> Option<Self> {
        data.checked_sub(1)
            .and_then(|id| u32::try_from(id).ok())
            .map(Self)
    }
}

/// Friction and restitution used when two materials touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl ContactMaterial {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }
}

/// Material registry plus the contact table between them
#[derive(Debug, Default)]
pub struct ContactMaterials {
    names: Vec<String>,
    pairs: FxHashMap<(MaterialId, MaterialId), ContactMaterial>,
}

impl ContactMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named material, returning the existing id if already known
    pub fn register(&mut self, name: impl Into<String>) -> MaterialId {
        let name = name.into();
        if let Some(index) = self.names.iter().position(|n| *n == name) {
            return MaterialId(index as u32);
        }
        self.names.push(name);
        MaterialId((self.names.len() - 1) as u32)
    }

    /// Name of a registered material
    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Define the contact between two materials (order does not matter)
    pub fn set_contact(&mut self, a: MaterialId, b: MaterialId, contact: ContactMaterial) {
        self.pairs.insert(Self::key(a, b), contact);
    }

    /// Look up the contact between two materials
    pub fn contact(&self, a: MaterialId, b: MaterialId) -> Option<ContactMaterial> {
        self.pairs.get(&Self::key(a, b)).copied()
    }

    fn key(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    fn contact_between(
        &self,
        colliders: &ColliderSet,
        c1: ColliderHandle,
        c2: ColliderHandle,
    ) -> Option<ContactMaterial> {
        let a = MaterialId::from_user_data(colliders.get(c1)?.user_data)?;
        let b = MaterialId::from_user_data(colliders.get(c2)?.user_data)?;
        self.contact(a, b)
    }
}

impl PhysicsHooks for ContactMaterials {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let Some(contact) =
            self.contact_between(context.colliders, context.collider1, context.collider2)
        else {
            return;
        };

        for solver_contact in context.solver_contacts.iter_mut() {
            solver_contact.friction = contact.friction;
            solver_contact.restitution = contact.restitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut materials = ContactMaterials::new();
        let plywood = materials.register("plywood");
        let plastic = materials.register("plastic");
        assert_ne!(plywood, plastic);
        assert_eq!(materials.register("plywood"), plywood);
        assert_eq!(materials.name(plastic), Some("plastic"));
    }

    #[test]
    fn test_contact_lookup_is_symmetric() {
        let mut materials = ContactMaterials::new();
        let plywood = materials.register("plywood");
        let plastic = materials.register("plastic");
        materials.set_contact(plywood, plastic, ContactMaterial::new(0.1, 0.7));

        assert_eq!(
            materials.contact(plastic, plywood),
            Some(ContactMaterial::new(0.1, 0.7))
        );
        assert_eq!(materials.contact(plywood, plywood), None);
    }

    #[test]
    fn test_user_data_packing() {
        let id = MaterialId(3);
        assert_eq!(MaterialId::from_user_data(id.to_user_data()), Some(id));
        assert_eq!(MaterialId::from_user_data(0), None);
    }
}
