use slotmap::new_key_type;

/// Identifier of the built-in primary system. Always present in the registry.
pub const PRIMARY_SYSTEM: &str = "SolarSystem";

/// Identifier of the built-in secondary system. Always present, never has
/// data-driven bodies of its own.
pub const EYE_SYSTEM: &str = "EyeOfTheUniverse";

new_key_type! {
    /// Identifies a registered body. Stable for the lifetime of the registry
    /// generation it was issued by; invalidated by a full reset.
    pub struct BodyId;
}

/// Opaque handle to a runtime object produced by an external builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeHandle(pub u64);

/// Whether `id` names one of the two built-in systems.
pub fn is_builtin(id: &str) -> bool {
    id == PRIMARY_SYSTEM || id == EYE_SYSTEM
}
