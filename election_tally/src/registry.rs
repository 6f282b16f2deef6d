use std::collections::HashMap;

/// Lookup table from party code to display name.
///
/// The table is read-only once built and is handed to the view functions
/// instead of living as a process-wide constant, so alternate tables can
/// be supplied at startup or in tests. Codes without an entry display as
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct PartyRegistry {
    names: HashMap<String, String>,
}

impl PartyRegistry {
    pub fn new() -> PartyRegistry {
        PartyRegistry {
            names: HashMap::new(),
        }
    }

    /// The standard UK table.
    pub fn uk_default() -> PartyRegistry {
        let mut registry = PartyRegistry::new();
        registry.register("C", "Conservative Party");
        registry.register("L", "Labour Party");
        registry.register("UKIP", "UKIP");
        registry.register("LD", "Liberal Democrats");
        registry.register("G", "Green Party");
        registry.register("Ind", "Independent");
        registry.register("SNP", "SNP");
        registry
    }

    pub fn register(&mut self, code: &str, name: &str) {
        self.names.insert(code.to_string(), name.to_string());
    }

    /// The display name for a code, or the code itself when unknown.
    pub fn party_name(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}
