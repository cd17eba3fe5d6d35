//! Per-pair contact coefficients.
//!
//! Rapier combines friction and restitution per collider. The scene needs a
//! pair rule instead: two bodies that both declare a material use the product
//! of their coefficients, any other pair falls back to the world default.
//! The table below is installed as physics hooks and rewrites the solver
//! contacts of every manifold.

use std::collections::HashMap;

use rapier3d::prelude::*;

use super::body::ContactMaterial;

#[derive(Debug, Clone)]
pub struct ContactMaterials {
    default: ContactMaterial,
    by_collider: HashMap<ColliderHandle, ContactMaterial>,
}

impl ContactMaterials {
    pub fn new(default: ContactMaterial) -> Self {
        Self {
            default,
            by_collider: HashMap::new(),
        }
    }

    pub fn default_material(&self) -> ContactMaterial {
        self.default
    }

    pub fn insert(&mut self, collider: ColliderHandle, material: ContactMaterial) {
        self.by_collider.insert(collider, material);
    }

    pub fn forget(&mut self, collider: ColliderHandle) {
        self.by_collider.remove(&collider);
    }

    pub fn clear(&mut self) {
        self.by_collider.clear();
    }

    pub fn resolve(&self, a: ColliderHandle, b: ColliderHandle) -> ContactMaterial {
        resolve_pair(
            self.by_collider.get(&a).copied(),
            self.by_collider.get(&b).copied(),
            self.default,
        )
    }
}

pub fn resolve_pair(
    a: Option<ContactMaterial>,
    b: Option<ContactMaterial>,
    default: ContactMaterial,
) -> ContactMaterial {
    match (a, b) {
        (Some(a), Some(b)) => a.combine(b),
        _ => default,
    }
}

impl PhysicsHooks for ContactMaterials {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let material = self.resolve(context.collider1, context.collider2);
        for contact in context.solver_contacts.iter_mut() {
            contact.friction = material.friction;
            contact.restitution = material.restitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: ContactMaterial = ContactMaterial::new(0.1, 0.9);

    #[test]
    fn test_both_materials_multiply() {
        let pair = resolve_pair(
            Some(ContactMaterial::new(0.9, 0.1)),
            Some(ContactMaterial::new(0.1, 0.3)),
            DEFAULT,
        );
        assert!((pair.friction - 0.09).abs() < 1e-6);
        assert!((pair.restitution - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_missing_material_uses_default() {
        let character = Some(ContactMaterial::new(0.1, 0.3));
        assert_eq!(resolve_pair(character, None, DEFAULT), DEFAULT);
        assert_eq!(resolve_pair(None, character, DEFAULT), DEFAULT);
        assert_eq!(resolve_pair(None, None, DEFAULT), DEFAULT);
    }

    #[test]
    fn test_table_lookup_by_collider() {
        let mut table = ContactMaterials::new(DEFAULT);
        let leg = ColliderHandle::invalid();
        assert_eq!(table.resolve(leg, leg), DEFAULT);

        table.insert(leg, ContactMaterial::new(0.5, 0.5));
        let pair = table.resolve(leg, leg);
        assert!((pair.restitution - 0.25).abs() < 1e-6);

        table.forget(leg);
        assert_eq!(table.resolve(leg, leg), DEFAULT);
    }
}
