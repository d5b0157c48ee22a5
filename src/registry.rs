use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::{Lazy, OnceCell};
use serde::Serialize;

use crate::spec::DiagramType;

/// Core modules loaded at registry construction. They back every renderer
/// and are never evicted.
pub const CORE_MODULES: [&str; 2] = ["theme-config", "shared-utilities"];

/// Maps a diagram type to the renderer module that serves it. Several
/// types share a module.
pub fn module_for(kind: DiagramType) -> &'static str {
    match kind {
        DiagramType::BubbleMap
        | DiagramType::CircleMap
        | DiagramType::DoubleBubbleMap
        | DiagramType::VennDiagram => "bubble-map-renderer",
        DiagramType::Flowchart
        | DiagramType::FlowMap
        | DiagramType::MultiFlowMap
        | DiagramType::BridgeMap => "flow-renderer",
        DiagramType::TreeMap => "tree-renderer",
        DiagramType::BraceMap => "brace-renderer",
        DiagramType::Mindmap => "mindmap-renderer",
        DiagramType::ConceptMap => "concept-map-renderer",
    }
}

/// A loaded renderer module: its name and the diagram types it serves.
#[derive(Debug, Clone)]
pub struct RendererModule {
    pub name: &'static str,
    pub kinds: Vec<DiagramType>,
}

impl RendererModule {
    fn load(name: &'static str) -> Self {
        let kinds = DiagramType::ALL
            .iter()
            .copied()
            .filter(|kind| module_for(*kind) == name)
            .collect();
        RendererModule { name, kinds }
    }
}

/// Hit/miss/load counters plus per-module access counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub access_counts: HashMap<String, u64>,
}

/// Cache of renderer modules with at-most-once loading. Concurrent callers
/// asking for the same unloaded module block on one shared initializer
/// instead of loading it twice.
pub struct RendererRegistry {
    cells: Mutex<HashMap<&'static str, Arc<OnceCell<RendererModule>>>>,
    stats: Mutex<RegistryStats>,
}

static GLOBAL: Lazy<RendererRegistry> = Lazy::new(RendererRegistry::new);

impl RendererRegistry {
    pub fn new() -> Self {
        let registry = RendererRegistry {
            cells: Mutex::new(HashMap::new()),
            stats: Mutex::new(RegistryStats::default()),
        };
        for name in CORE_MODULES {
            registry.preload(name);
        }
        registry
    }

    /// The process-wide registry used by the render entry points.
    pub fn global() -> &'static RendererRegistry {
        &GLOBAL
    }

    fn preload(&self, name: &'static str) {
        let cell = Arc::new(OnceCell::new());
        let _ = cell.set(RendererModule::load(name));
        self.cells_lock().insert(name, cell);
        self.stats_lock().loads += 1;
    }

    fn cells_lock(&self) -> MutexGuard<'_, HashMap<&'static str, Arc<OnceCell<RendererModule>>>> {
        match self.cells.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn stats_lock(&self) -> MutexGuard<'_, RegistryStats> {
        match self.stats.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the module for `name`, loading it at most once. Unknown
    /// names fall back to the mindmap module.
    pub fn get_or_load(&self, name: &str) -> RendererModule {
        let name = Self::known_name(name).unwrap_or("mindmap-renderer");

        let cell = {
            let mut cells = self.cells_lock();
            Arc::clone(cells.entry(name).or_default())
        };
        // Init runs outside the map lock so other modules stay reachable
        // while this one loads. Only the caller whose closure ran counts
        // as the load; racers that blocked on it observe a hit.
        let mut loaded_here = false;
        let module = cell
            .get_or_init(|| {
                loaded_here = true;
                RendererModule::load(name)
            })
            .clone();

        let mut stats = self.stats_lock();
        if loaded_here {
            stats.misses += 1;
            stats.loads += 1;
        } else {
            stats.hits += 1;
        }
        *stats.access_counts.entry(name.to_string()).or_insert(0) += 1;
        module
    }

    /// Module lookup by diagram type.
    pub fn get_for_kind(&self, kind: DiagramType) -> RendererModule {
        self.get_or_load(module_for(kind))
    }

    fn known_name(name: &str) -> Option<&'static str> {
        CORE_MODULES
            .iter()
            .copied()
            .find(|n| *n == name)
            .or_else(|| {
                DiagramType::ALL
                    .iter()
                    .map(|kind| module_for(*kind))
                    .find(|n| *n == name)
            })
    }

    /// Evicts everything except the core modules. Counters are preserved.
    pub fn clear(&self) {
        self.cells_lock()
            .retain(|name, _| CORE_MODULES.contains(name));
    }

    pub fn snapshot(&self) -> RegistryStats {
        self.stats_lock().clone()
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        RendererRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_modules_cover_all_types() {
        for kind in DiagramType::ALL {
            let module = module_for(kind);
            assert!(RendererRegistry::known_name(module).is_some());
        }
        assert_eq!(module_for(DiagramType::BubbleMap), module_for(DiagramType::VennDiagram));
        assert_eq!(module_for(DiagramType::Flowchart), module_for(DiagramType::BridgeMap));
    }

    #[test]
    fn second_request_is_a_hit() {
        let registry = RendererRegistry::new();
        registry.get_or_load("tree-renderer");
        registry.get_or_load("tree-renderer");
        let stats = registry.snapshot();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.access_counts["tree-renderer"], 2);
    }

    #[test]
    fn unknown_name_falls_back_to_mindmap() {
        let registry = RendererRegistry::new();
        let module = registry.get_or_load("no-such-renderer");
        assert_eq!(module.name, "mindmap-renderer");
    }

    #[test]
    fn clear_keeps_core_modules_loaded() {
        let registry = RendererRegistry::new();
        registry.get_or_load("brace-renderer");
        registry.clear();

        let cells = registry.cells_lock();
        assert!(cells.contains_key("theme-config"));
        assert!(cells.contains_key("shared-utilities"));
        assert!(!cells.contains_key("brace-renderer"));
    }

    #[test]
    fn module_loads_at_most_once_under_contention() {
        let registry = RendererRegistry::new();
        let preloads = registry.snapshot().loads;
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    registry.get_or_load("tree-renderer");
                });
            }
        });
        let stats = registry.snapshot();
        assert_eq!(stats.loads, preloads + 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 7);
        assert_eq!(stats.access_counts["tree-renderer"], 8);
    }

    #[test]
    fn loaded_module_lists_its_kinds() {
        let registry = RendererRegistry::new();
        let module = registry.get_for_kind(DiagramType::CircleMap);
        assert_eq!(module.name, "bubble-map-renderer");
        assert!(module.kinds.contains(&DiagramType::BubbleMap));
        assert!(module.kinds.contains(&DiagramType::VennDiagram));
        assert_eq!(registry.snapshot().access_counts["bubble-map-renderer"], 1);
    }
}
