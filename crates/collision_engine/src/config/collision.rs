//! Collision settings file
//!
//! ```json
//! {
//!   "Gridsize": { "x": 2000.0, "y": 2000.0 },
//!   "collisionLayers": [
//!     { "collisionLayerIndex": 0, "collisionLayerName": "Layer 0", "collisionLayerSignature": "1111111111" }
//!   ]
//! }
//! ```

use super::{Config, ConfigError};
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::{CollisionLayerRegistry, LayerSignature, TOTAL_COLLISION_LAYERS};
use crate::spatial::SpatialGrid;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World size covered by the collision grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    /// Width
    pub x: f32,
    /// Height
    pub y: f32,
}

impl GridSize {
    /// Whether a grid can be built for this size
    ///
    /// Both axes must be finite and positive, and the cell count must stay
    /// within [`crate::spatial::MAX_CELLS`].
    pub fn is_usable(&self) -> bool {
        self.x > 0.0 && self.y > 0.0 && SpatialGrid::dimensions_for(self.x, self.y).is_some()
    }
}

impl From<GridSize> for Vec2 {
    fn from(size: GridSize) -> Self {
        Self::new(size.x, size.y)
    }
}

impl From<Vec2> for GridSize {
    fn from(size: Vec2) -> Self {
        Self { x: size.x, y: size.y }
    }
}

/// Persisted state of one collision layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    /// Layer index
    #[serde(rename = "collisionLayerIndex")]
    pub index: i64,

    /// Display name
    #[serde(rename = "collisionLayerName")]
    pub name: String,

    /// Signature bits, highest layer first
    #[serde(rename = "collisionLayerSignature")]
    pub signature: String,
}

/// Collision manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// World size covered by the grid
    #[serde(rename = "Gridsize")]
    pub grid_size: GridSize,

    /// Layer names and signatures
    #[serde(rename = "collisionLayers")]
    pub collision_layers: Vec<LayerEntry>,
}

impl CollisionConfig {
    /// Default world width and height
    pub const DEFAULT_GRID_SIZE: f32 = 2000.0;

    /// Build a configuration from live state
    pub fn from_parts(grid_size: Vec2, layers: &CollisionLayerRegistry) -> Self {
        Self {
            grid_size: grid_size.into(),
            collision_layers: layers
                .layers()
                .iter()
                .map(|layer| LayerEntry {
                    // Layer indices are below TOTAL_COLLISION_LAYERS
                    index: layer.index() as i64,
                    name: layer.name().to_string(),
                    signature: layer.signature().to_string(),
                })
                .collect(),
        }
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded collision config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default collision config, could not load {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Grid size to use, or the default when the configured one is unusable
    pub fn grid_size_or_default(&self) -> Vec2 {
        if self.grid_size.is_usable() {
            self.grid_size.into()
        } else {
            log::warn!(
                "Collision grid size {}x{} is unusable, using {}x{}",
                self.grid_size.x,
                self.grid_size.y,
                Self::DEFAULT_GRID_SIZE,
                Self::DEFAULT_GRID_SIZE
            );
            Vec2::new(Self::DEFAULT_GRID_SIZE, Self::DEFAULT_GRID_SIZE)
        }
    }

    /// Build the layer registry described by this configuration
    ///
    /// Invalid entries are skipped with a warning and the layer keeps its defaults.
    pub fn layer_registry(&self) -> CollisionLayerRegistry {
        let mut registry = CollisionLayerRegistry::new();
        for entry in &self.collision_layers {
            if let Err(e) = apply_entry(&mut registry, entry) {
                log::warn!("Skipping collision layer entry: {}", e);
            }
        }
        registry
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::from_parts(
            Vec2::new(Self::DEFAULT_GRID_SIZE, Self::DEFAULT_GRID_SIZE),
            &CollisionLayerRegistry::new(),
        )
    }
}

impl Config for CollisionConfig {}

fn apply_entry(registry: &mut CollisionLayerRegistry, entry: &LayerEntry) -> Result<(), ConfigError> {
    let index = usize::try_from(entry.index)
        .ok()
        .filter(|&index| index < TOTAL_COLLISION_LAYERS)
        .ok_or(ConfigError::InvalidLayerIndex(entry.index))?;
    let signature = entry
        .signature
        .parse::<LayerSignature>()
        .map_err(|source| ConfigError::InvalidSignature { index, source })?;

    let layer = registry
        .layer_mut(index)
        .ok_or(ConfigError::InvalidLayerIndex(entry.index))?;
    layer.set_name(entry.name.clone());
    layer.set_signature(signature);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision_layers::LayerLookup;

    const SAMPLE: &str = r#"{
        "Gridsize": { "x": 1200.0, "y": 800.0 },
        "collisionLayers": [
            { "collisionLayerIndex": 0, "collisionLayerName": "Player", "collisionLayerSignature": "1111111110" },
            { "collisionLayerIndex": 1, "collisionLayerName": "Broken", "collisionLayerSignature": "11" },
            { "collisionLayerIndex": 42, "collisionLayerName": "Missing", "collisionLayerSignature": "1111111111" }
        ]
    }"#;

    #[test]
    fn test_parse_json_format() {
        let config: CollisionConfig = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(config.grid_size, GridSize { x: 1200.0, y: 800.0 });
        assert_eq!(config.collision_layers.len(), 3);
        assert_eq!(config.collision_layers[0].name, "Player");
    }

    #[test]
    fn test_invalid_entries_keep_defaults() {
        let config: CollisionConfig = serde_json::from_str(SAMPLE).unwrap();
        let registry = config.layer_registry();

        let player = registry.layer(0).unwrap();
        assert_eq!(player.name(), "Player");
        assert!(!player.is_colliding_with(0));
        assert!(player.is_colliding_with(9));

        let broken = registry.layer(1).unwrap();
        assert_eq!(broken.name(), "Layer 1");
        assert_eq!(broken.signature(), LayerSignature::all());
    }

    #[test]
    fn test_default_config() {
        let config = CollisionConfig::default();

        assert_eq!(config.grid_size, GridSize { x: 2000.0, y: 2000.0 });
        assert_eq!(config.collision_layers.len(), TOTAL_COLLISION_LAYERS);
        assert!(config
            .collision_layers
            .iter()
            .all(|entry| entry.signature == "1111111111"));
        assert_eq!(config.collision_layers[7].name, "Layer 7");
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_string(&CollisionConfig::default()).unwrap();

        assert!(json.contains("\"Gridsize\""));
        assert!(json.contains("\"collisionLayerSignature\":\"1111111111\""));
    }

    #[test]
    fn test_oversized_grid_size_falls_back() {
        let config: CollisionConfig = serde_json::from_str(r#"{"Gridsize": {"x": 1e39, "y": 200.0}}"#).unwrap();

        assert!(config.grid_size.x.is_infinite());
        assert!(!config.grid_size.is_usable());
        assert_eq!(config.grid_size_or_default(), Vec2::new(2000.0, 2000.0));
        // Layers still fall back to their defaults
        assert_eq!(config.collision_layers.len(), TOTAL_COLLISION_LAYERS);
    }

    #[test]
    fn test_grid_size_usability() {
        assert!(GridSize { x: 640.0, y: 480.0 }.is_usable());
        assert!(!GridSize { x: 0.0, y: 480.0 }.is_usable());
        assert!(!GridSize { x: -10.0, y: 480.0 }.is_usable());
        assert!(!GridSize { x: f32::NAN, y: 480.0 }.is_usable());
        assert!(!GridSize { x: 1.0e6, y: 1.0e6 }.is_usable());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = CollisionConfig::load_or_default("definitely/not/here/collision.json");
        assert_eq!(config, CollisionConfig::default());
    }

    #[test]
    fn test_save_and_load_json_file() {
        let path = std::env::temp_dir().join(format!("collision_config_{}.json", std::process::id()));
        let mut registry = CollisionLayerRegistry::new();
        registry.set_collides(2, 3, false);
        let config = CollisionConfig::from_parts(Vec2::new(640.0, 480.0), &registry);

        config.save_to_file(&path).unwrap();
        let loaded = CollisionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
        assert!(!loaded.layer_registry().should_collide(2, 3));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = CollisionConfig::default().save_to_file("collision.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
