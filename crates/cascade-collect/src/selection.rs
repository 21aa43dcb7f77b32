//! Attribute selection.

use cascade_core::StepPoint;

/// Attributes recordable at one step point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepPointSelection {
    /// Position [cm].
    pub position: bool,
    /// Unit direction.
    pub direction: bool,
    /// Lab time [ns].
    pub time: bool,
    /// Kinetic energy [MeV].
    pub energy: bool,
    /// Volume id.
    pub volume: bool,
    /// Volume-instance chain (bounded depth).
    pub volume_instances: bool,
}

impl StepPointSelection {
    /// Select every point attribute.
    pub fn all() -> Self {
        Self {
            position: true,
            direction: true,
            time: true,
            energy: true,
            volume: true,
            volume_instances: true,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.position |= other.position;
        self.direction |= other.direction;
        self.time |= other.time;
        self.energy |= other.energy;
        self.volume |= other.volume;
        self.volume_instances |= other.volume_instances;
    }
}

/// The full per-step attribute selection.
///
/// Multiple interfaces sharing one collector have their selections
/// merged with [`StepSelection::merge`]; each row then carries the
/// union and every interface reads what it asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSelection {
    /// Per-point selections, indexed by [`StepPoint`].
    pub points: [StepPointSelection; 2],
    /// Energy deposited over the step [MeV].
    pub energy_deposition: bool,
    /// Step length [cm].
    pub step_length: bool,
    /// Particle species.
    pub particle: bool,
    /// Track identity.
    pub track_id: bool,
    /// Owning event.
    pub event_id: bool,
    /// Producing track.
    pub parent_id: bool,
    /// The post-step action selected for the step.
    pub action: bool,
}

impl StepSelection {
    /// Select everything.
    pub fn all() -> Self {
        Self {
            points: [StepPointSelection::all(); 2],
            energy_deposition: true,
            step_length: true,
            particle: true,
            track_id: true,
            event_id: true,
            parent_id: true,
            action: true,
        }
    }

    /// The selection for one point.
    pub fn point(&self, point: StepPoint) -> &StepPointSelection {
        &self.points[point.index()]
    }

    /// Merge another interface's selection into this one.
    pub fn merge(&mut self, other: &Self) {
        self.points[0].merge(&other.points[0]);
        self.points[1].merge(&other.points[1]);
        self.energy_deposition |= other.energy_deposition;
        self.step_length |= other.step_length;
        self.particle |= other.particle;
        self.track_id |= other.track_id;
        self.event_id |= other.event_id;
        self.parent_id |= other.parent_id;
        self.action |= other.action;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_a_union() {
        let mut a = StepSelection {
            energy_deposition: true,
            ..Default::default()
        };
        let b = StepSelection {
            track_id: true,
            points: [
                StepPointSelection {
                    position: true,
                    ..Default::default()
                },
                StepPointSelection::default(),
            ],
            ..Default::default()
        };
        a.merge(&b);
        assert!(a.energy_deposition);
        assert!(a.track_id);
        assert!(a.points[0].position);
        assert!(!a.points[1].position);
    }
}
