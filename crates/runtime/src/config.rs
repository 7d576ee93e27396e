use ability_core::EngineConfig;

/// Which side of the network this engine simulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationRole {
    /// Server: owns the truth and replicates snapshots.
    #[default]
    Authoritative,
    /// Client: predicts locally and reconciles against server snapshots.
    Predictive,
}

impl SimulationRole {
    pub fn is_authoritative(self) -> bool {
        matches!(self, Self::Authoritative)
    }
}

/// Runtime configuration shared by the engine, inbox and replication.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub inbox_capacity: usize,
    pub role: SimulationRole,
}

impl RuntimeConfig {
    pub fn with_role(mut self, role: SimulationRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            inbox_capacity: 256,
            role: SimulationRole::default(),
        }
    }
}
