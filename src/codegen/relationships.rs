//! Relationship inference between entities.
//!
//! Foreign keys are declared on one side only. This module derives, for every
//! entity, the single-valued associations it owns (outgoing) and the collection
//! associations pointing back at it (incoming). Resolution is one flat pass with
//! a reverse index, so self-references and cycles need no special handling.

use crate::codegen::types::Entity;
use indexmap::IndexMap;

/// Single-valued association declared by a foreign-key property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingAssociation {
    pub property: String,
    pub target: String,
}

/// Collection association derived from another entity's foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingAssociation {
    /// Entity that declares the foreign key
    pub source: String,
    /// Foreign-key property on `source`
    pub property: String,
}

/// Derived navigation data for one entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipInfo {
    pub outgoing: Vec<OutgoingAssociation>,
    pub incoming: Vec<IncomingAssociation>,
}

impl RelationshipInfo {
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

/// Relationship data for a whole project, keyed by entity name in declaration order
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_entity: IndexMap<String, RelationshipInfo>,
}

static EMPTY: RelationshipInfo = RelationshipInfo {
    outgoing: Vec::new(),
    incoming: Vec::new(),
};

impl Relationships {
    /// Resolve relationships over the full entity set.
    ///
    /// Every foreign key yields exactly one outgoing entry on its owner and one
    /// incoming entry on its target; two keys pointing at the same entity give
    /// two entries. Targets outside the set keep their outgoing entry only.
    pub fn resolve(entities: &[Entity]) -> Self {
        let mut by_entity: IndexMap<String, RelationshipInfo> = entities
            .iter()
            .map(|e| (e.name.clone(), RelationshipInfo::default()))
            .collect();

        // Reverse index: target -> (source, property), in declaration order
        let mut reverse: IndexMap<&str, Vec<IncomingAssociation>> = IndexMap::new();

        for entity in entities {
            for prop in entity.foreign_keys() {
                let Some(target) = prop.references.as_deref() else {
                    continue;
                };

                if let Some(info) = by_entity.get_mut(&entity.name) {
                    info.outgoing.push(OutgoingAssociation {
                        property: prop.name.clone(),
                        target: target.to_string(),
                    });
                }

                reverse.entry(target).or_default().push(IncomingAssociation {
                    source: entity.name.clone(),
                    property: prop.name.clone(),
                });
            }
        }

        for (target, incoming) in reverse {
            if let Some(info) = by_entity.get_mut(target) {
                info.incoming = incoming;
            }
        }

        tracing::debug!(entities = by_entity.len(), "resolved entity relationships");

        Relationships { by_entity }
    }

    /// Relationship data for an entity; unknown names get an empty record
    pub fn get(&self, entity: &str) -> &RelationshipInfo {
        self.by_entity.get(entity).unwrap_or(&EMPTY)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.by_entity.contains_key(entity)
    }
}
