//! Collision layer system for filtering collision detection
//!
//! There is a fixed number of layers. Each layer owns a signature: the set of
//! layers it collides with. Every layer starts out colliding with every layer,
//! itself included.

use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

/// Number of collision layers
pub const TOTAL_COLLISION_LAYERS: usize = 10;

/// Index of a collision layer, in `0..TOTAL_COLLISION_LAYERS`
pub type LayerIndex = usize;

bitflags! {
    /// Set of layers a layer collides with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerSignature: u16 {
        /// Layer 0
        const LAYER_0 = 1 << 0;
        /// Layer 1
        const LAYER_1 = 1 << 1;
        /// Layer 2
        const LAYER_2 = 1 << 2;
        /// Layer 3
        const LAYER_3 = 1 << 3;
        /// Layer 4
        const LAYER_4 = 1 << 4;
        /// Layer 5
        const LAYER_5 = 1 << 5;
        /// Layer 6
        const LAYER_6 = 1 << 6;
        /// Layer 7
        const LAYER_7 = 1 << 7;
        /// Layer 8
        const LAYER_8 = 1 << 8;
        /// Layer 9
        const LAYER_9 = 1 << 9;
    }
}

impl LayerSignature {
    /// The single-bit signature for one layer
    pub fn layer(index: LayerIndex) -> Option<Self> {
        (index < TOTAL_COLLISION_LAYERS).then(|| Self::from_bits_truncate(1 << index))
    }

    /// Whether the bit for `index` is set
    pub fn contains_layer(&self, index: LayerIndex) -> bool {
        Self::layer(index).is_some_and(|bit| self.contains(bit))
    }
}

impl fmt::Display for LayerSignature {
    /// Most significant layer first, e.g. `1111111110` collides with all but layer 0
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in (0..TOTAL_COLLISION_LAYERS).rev() {
            f.write_str(if self.contains_layer(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Error parsing a signature bit string
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSignatureError {
    /// Wrong number of characters
    #[error("expected {TOTAL_COLLISION_LAYERS} bits, found {0}")]
    Length(usize),

    /// A character other than `0` or `1`
    #[error("invalid bit character {0:?}")]
    InvalidBit(char),
}

impl FromStr for LayerSignature {
    type Err = ParseSignatureError;

    fn from_str(bits: &str) -> Result<Self, Self::Err> {
        let length = bits.chars().count();
        if length != TOTAL_COLLISION_LAYERS {
            return Err(ParseSignatureError::Length(length));
        }

        let mut signature = Self::empty();
        for (position, bit) in bits.chars().enumerate() {
            let index = TOTAL_COLLISION_LAYERS - 1 - position;
            match bit {
                '1' => signature |= Self::from_bits_truncate(1 << index),
                '0' => {}
                other => return Err(ParseSignatureError::InvalidBit(other)),
            }
        }
        Ok(signature)
    }
}

/// A named collision layer and the layers it collides with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionLayer {
    index: LayerIndex,
    name: String,
    signature: LayerSignature,
}

impl CollisionLayer {
    /// Create a layer named after its index that collides with everything
    pub fn new(index: LayerIndex) -> Self {
        Self {
            index,
            name: format!("Layer {index}"),
            signature: LayerSignature::all(),
        }
    }

    /// Layer index
    pub fn index(&self) -> LayerIndex {
        self.index
    }

    /// Layer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the layer
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Current signature
    pub fn signature(&self) -> LayerSignature {
        self.signature
    }

    /// Replace the signature
    pub fn set_signature(&mut self, signature: LayerSignature) {
        self.signature = signature;
    }

    /// Whether this layer collides with the layer at `other`
    pub fn is_colliding_with(&self, other: LayerIndex) -> bool {
        self.signature.contains_layer(other)
    }

    /// Toggle whether this layer collides with the layer at `other`
    pub fn flip_collision_layer_bit(&mut self, other: LayerIndex) {
        if let Some(bit) = LayerSignature::layer(other) {
            self.signature.toggle(bit);
        }
    }
}

/// Read access to collision layers, injected into the collision manager
pub trait LayerLookup {
    /// Get the layer at `index`, if it exists
    fn layer(&self, index: LayerIndex) -> Option<&CollisionLayer>;

    /// Check if colliders on two layers should be tested against each other
    ///
    /// Both layers must list each other; unknown layers never collide.
    fn should_collide(&self, layer_a: LayerIndex, layer_b: LayerIndex) -> bool {
        match (self.layer(layer_a), self.layer(layer_b)) {
            (Some(a), Some(b)) => a.is_colliding_with(layer_b) && b.is_colliding_with(layer_a),
            _ => false,
        }
    }
}

/// The fixed set of collision layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionLayerRegistry {
    layers: Vec<CollisionLayer>,
}

impl CollisionLayerRegistry {
    /// Create the default registry: every layer collides with every layer
    pub fn new() -> Self {
        Self {
            layers: (0..TOTAL_COLLISION_LAYERS).map(CollisionLayer::new).collect(),
        }
    }

    /// All layers, ordered by index
    pub fn layers(&self) -> &[CollisionLayer] {
        &self.layers
    }

    /// Mutable access to one layer
    pub fn layer_mut(&mut self, index: LayerIndex) -> Option<&mut CollisionLayer> {
        self.layers.get_mut(index)
    }

    /// Set whether two layers collide, updating both signatures
    pub fn set_collides(&mut self, layer_a: LayerIndex, layer_b: LayerIndex, collides: bool) {
        let (Some(bit_a), Some(bit_b)) = (LayerSignature::layer(layer_a), LayerSignature::layer(layer_b)) else {
            return;
        };
        self.layers[layer_a].signature.set(bit_b, collides);
        self.layers[layer_b].signature.set(bit_a, collides);
    }
}

impl Default for CollisionLayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerLookup for CollisionLayerRegistry {
    fn layer(&self, index: LayerIndex) -> Option<&CollisionLayer> {
        self.layers.get(index)
    }
}
