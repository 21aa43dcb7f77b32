//! Stepper configuration and validation.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use cascade_core::{ActionId, StepOrder, StreamId};
use cascade_action::{ActionRegistry, RegistryError};
use cascade_params::{CoreParams, ParamsError};

use crate::hook::StepHook;

// ── ConfigError ─────────────────────────────────────────────────

/// Errors detected while building a [`Stepper`](crate::Stepper).
#[derive(Debug)]
pub enum ConfigError {
    /// Params failed validation or access.
    Params(ParamsError),
    /// Action registration failed.
    Registry(RegistryError),
    /// The slot bank would be empty.
    ZeroTrackSlots,
    /// The initializer buffer would be empty.
    ZeroInitializerCapacity,
    /// The stream index exceeds the configured maximum.
    StreamOutOfRange {
        /// Requested stream.
        stream: StreamId,
        /// Configured bound.
        max_streams: u32,
    },
    /// A core scalar references an action the registry does not hold.
    UnknownAction {
        /// Which scalar is broken.
        what: &'static str,
        /// The dangling id.
        id: ActionId,
    },
    /// An action is registered at the wrong pipeline order.
    WrongOrder {
        /// The action's label.
        label: String,
        /// The order the pipeline requires.
        expected: StepOrder,
        /// The order the action reports.
        got: StepOrder,
    },
    /// Slot refill must run before the pre-step scratch reset.
    InitAfterPreStep,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Params(e) => write!(f, "params: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::ZeroTrackSlots => write!(f, "num_track_slots must be at least 1"),
            Self::ZeroInitializerCapacity => {
                write!(f, "initializer_capacity must be at least 1")
            }
            Self::StreamOutOfRange {
                stream,
                max_streams,
            } => write!(f, "stream {stream} exceeds max_streams {max_streams}"),
            Self::UnknownAction { what, id } => {
                write!(f, "core scalar '{what}' references unregistered action {id}")
            }
            Self::WrongOrder {
                label,
                expected,
                got,
            } => write!(
                f,
                "action '{label}' must run at order {expected:?}, not {got:?}"
            ),
            Self::InitAfterPreStep => write!(
                f,
                "initialize-tracks must be registered before the pre-step action"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Params(e) => Some(e),
            Self::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParamsError> for ConfigError {
    fn from(e: ParamsError) -> Self {
        Self::Params(e)
    }
}

impl From<RegistryError> for ConfigError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ── StepperInput ────────────────────────────────────────────────

/// Input for constructing a [`Stepper`](crate::Stepper).
pub struct StepperInput {
    /// Shared problem description.
    pub params: Arc<CoreParams>,
    /// The frozen action catalog.
    pub actions: Arc<ActionRegistry>,
    /// The stream this stepper serves.
    pub stream_id: StreamId,
    /// Slot-bank capacity; `None` uses the params default.
    pub num_track_slots: Option<usize>,
    /// Initializer-buffer capacity; `None` uses the params default.
    pub initializer_capacity: Option<usize>,
    /// End-of-step hooks, run in order after the pipeline.
    pub hooks: Vec<Box<dyn StepHook>>,
}

impl StepperInput {
    /// Resolve the slot-bank capacity.
    pub(crate) fn resolved_track_slots(&self) -> usize {
        self.num_track_slots
            .unwrap_or(self.params.init().tracks_per_stream)
    }

    /// Resolve the initializer-buffer capacity.
    pub(crate) fn resolved_initializer_capacity(&self) -> usize {
        self.initializer_capacity
            .unwrap_or(self.params.init().capacity)
    }

    /// Check the configuration against the registry.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.resolved_track_slots() == 0 {
            return Err(ConfigError::ZeroTrackSlots);
        }
        if self.resolved_initializer_capacity() == 0 {
            return Err(ConfigError::ZeroInitializerCapacity);
        }
        let scalars = self.params.scalars();
        if self.stream_id.0 >= scalars.max_streams {
            return Err(ConfigError::StreamOutOfRange {
                stream: self.stream_id,
                max_streams: scalars.max_streams,
            });
        }

        let check = |what: &'static str,
                     id: Option<ActionId>,
                     expected: StepOrder|
         -> Result<(), ConfigError> {
            let id = id.expect("scalars validated at params construction");
            let action = self
                .actions
                .get(id)
                .ok_or(ConfigError::UnknownAction { what, id })?;
            if action.order() != expected {
                return Err(ConfigError::WrongOrder {
                    label: action.label().to_string(),
                    expected,
                    got: action.order(),
                });
            }
            Ok(())
        };
        check(
            "init_tracks_action",
            scalars.init_tracks_action,
            StepOrder::PreStep,
        )?;
        check("pre_step_action", scalars.pre_step_action, StepOrder::PreStep)?;
        check(
            "along_step_action",
            scalars.along_step_action,
            StepOrder::Along,
        )?;
        check(
            "along_step_neutral_action",
            scalars.along_step_neutral_action,
            StepOrder::Along,
        )?;
        check(
            "discrete_select_action",
            scalars.discrete_select_action,
            StepOrder::PrePost,
        )?;
        check("boundary_action", scalars.boundary_action, StepOrder::Post)?;
        check(
            "tracking_cut_action",
            scalars.tracking_cut_action,
            StepOrder::Post,
        )?;
        check(
            "propagation_limit_action",
            scalars.propagation_limit_action,
            StepOrder::Post,
        )?;
        if scalars.init_tracks_action >= scalars.pre_step_action {
            return Err(ConfigError::InitAfterPreStep);
        }

        // Every interaction kernel referenced by the physics tables
        // must be registered at the post order.
        let physics = self.params.physics();
        for particle in self.params.particles().particles.ids() {
            for (_, def) in physics.processes(particle).iter() {
                let action =
                    self.actions
                        .get(def.action)
                        .ok_or(ConfigError::UnknownAction {
                            what: "physics process",
                            id: def.action,
                        })?;
                if action.order() != StepOrder::Post {
                    return Err(ConfigError::WrongOrder {
                        label: action.label().to_string(),
                        expected: StepOrder::Post,
                        got: action.order(),
                    });
                }
            }
        }
        Ok(())
    }
}
