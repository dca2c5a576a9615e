//! Naming and escaping helpers shared by every generator.
//!
//! Repository and controller generators, and the service registrations in
//! `Program.cs`, all derive implementation names through
//! [`implementation_name`]; nothing else strips the interface prefix.

use convert_case::{Case, Casing};
use std::borrow::Cow;

/// Marker character that starts every interface name
pub const INTERFACE_PREFIX: char = 'I';

/// Suffix appended when an interface name lacks the prefix
pub const IMPLEMENTATION_SUFFIX: &str = "Impl";

/// Result of deriving an implementation name from an interface name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationName<'a> {
    pub name: Cow<'a, str>,
    /// False when the interface name lacked the prefix
    pub had_prefix: bool,
}

/// Derive the implementation identifier for an interface-style name.
///
/// `IVehicleRepository` becomes `VehicleRepository`. The prefix is only
/// stripped when followed by an uppercase letter; any other name gets
/// [`IMPLEMENTATION_SUFFIX`] appended so the two identifiers never coincide.
pub fn implementation_name(interface: &str) -> ImplementationName<'_> {
    let mut chars = interface.chars();
    let stripped = match (chars.next(), chars.next()) {
        (Some(INTERFACE_PREFIX), Some(second)) if second.is_uppercase() => {
            Some(&interface[INTERFACE_PREFIX.len_utf8()..])
        }
        _ => None,
    };

    match stripped {
        Some(name) => ImplementationName {
            name: Cow::Borrowed(name),
            had_prefix: true,
        },
        None => ImplementationName {
            name: Cow::Owned(format!("{}{}", interface, IMPLEMENTATION_SUFFIX)),
            had_prefix: false,
        },
    }
}

/// Conventional repository interface for an entity
pub fn repository_interface_for(entity: &str) -> String {
    format!("{}{}Repository", INTERFACE_PREFIX, entity)
}

/// Collection name for an entity (simple suffix append)
pub fn pluralize(name: &str) -> String {
    format!("{}s", name)
}

/// Convert a string to camelCase
pub fn to_camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// Escape a string for use in a C# string literal
pub fn escape_csharp_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implementation_name_strips_prefix() {
        let derived = implementation_name("IVehicleRepository");
        assert_eq!(derived.name, "VehicleRepository");
        assert!(derived.had_prefix);
    }

    #[test]
    fn test_implementation_name_without_prefix() {
        let derived = implementation_name("InventoryStore");
        assert_eq!(derived.name, "InventoryStoreImpl");
        assert!(!derived.had_prefix);

        assert!(!implementation_name("I").had_prefix);
        assert!(!implementation_name("").had_prefix);
    }

    #[test]
    fn test_repository_interface_round_trip() {
        let interface = repository_interface_for("ParkingSlot");
        assert_eq!(interface, "IParkingSlotRepository");
        assert_eq!(implementation_name(&interface).name, "ParkingSlotRepository");
    }

    #[test]
    fn test_pluralize_and_case() {
        assert_eq!(pluralize("Vehicle"), "Vehicles");
        assert_eq!(to_camel_case("SlotId"), "slotId");
        assert_eq!(to_camel_case("Id"), "id");
    }

    #[test]
    fn test_escape_csharp_string() {
        assert_eq!(escape_csharp_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_csharp_string("a\\b\nc"), "a\\\\b\\nc");
    }
}
