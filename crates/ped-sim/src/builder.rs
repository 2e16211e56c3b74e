//! Fluent builder for constructing a [`Simulation`].

use ped_core::{Logger, SimConfig};
use ped_model::OperationalModel;
use ped_spatial::Geometry;

use crate::{SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`OperationalModel`]: the force model and its model-level parameters,
///   fixed for the lifetime of the simulation
/// - [`Geometry`]: from [`ped_spatial::GeometryBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                          |
/// |-----------------|----------------------------------|
/// | `.config(c)`    | `SimConfig::default()` (dt 0.01) |
/// | `.logger(l)`    | `Logger::new()` (no callbacks)   |
///
/// # Example
///
/// ```rust,ignore
/// let geometry = GeometryBuilder::new([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
///     .build()?;
/// let mut sim = SimBuilder::new(OperationalModel::default_for(ModelKind::CollisionFreeSpeed), geometry)
///     .config(SimConfig { dt: 0.05, ..Default::default() })
///     .build()?;
/// ```
pub struct SimBuilder {
    model:    OperationalModel,
    geometry: Geometry,
    config:   SimConfig,
    logger:   Logger,
}

impl SimBuilder {
    pub fn new(model: OperationalModel, geometry: Geometry) -> Self {
        Self {
            model,
            geometry,
            config: SimConfig::default(),
            logger: Logger::new(),
        }
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Diagnostics sink.  Messages also go out as `tracing` events.
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Validate the configuration and model parameters and return an empty
    /// simulation at iteration 0.
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;
        self.model.validate()?;

        self.logger.info(format_args!(
            "simulation built: model {}, dt {} s, {} walls, walkable area {:.2} m²",
            self.model.kind(),
            self.config.dt,
            self.geometry.wall_count(),
            self.geometry.area(),
        ));
        Ok(Simulation::new(self.config, self.model, self.geometry, self.logger))
    }
}
