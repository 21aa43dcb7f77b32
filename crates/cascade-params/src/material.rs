//! Material table and the volume → material mapping.

use cascade_core::{ItemMap, PhysMatId, VolumeId};

/// One physics material.
///
/// The core never interprets material properties itself; cross
/// sections and stopping powers are tabulated per material in the
/// physics table. The definition here is identification only.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDef {
    /// Human-readable name.
    pub label: String,
}

/// The material table.
#[derive(Clone, Debug, Default)]
pub struct MaterialParams {
    /// Materials by id.
    pub materials: ItemMap<PhysMatId, MaterialDef>,
}

impl MaterialParams {
    /// Build from a list of labels.
    pub fn from_labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            materials: labels
                .into_iter()
                .map(|l| MaterialDef { label: l.into() })
                .collect(),
        }
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Mapping from logical volume to its fill material.
#[derive(Clone, Debug, Default)]
pub struct GeoMaterialParams {
    /// Material per volume, indexed by `VolumeId`.
    pub volume_to_material: ItemMap<VolumeId, PhysMatId>,
}

impl GeoMaterialParams {
    /// The material filling `volume`.
    pub fn material(&self, volume: VolumeId) -> PhysMatId {
        self.volume_to_material[volume]
    }
}
