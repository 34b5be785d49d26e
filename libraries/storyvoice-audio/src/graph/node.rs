//! Node handles, connection endpoints, and the small stateless-ish nodes

/// Handle of a node inside an `AudioGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw index of the node
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a node does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Audio entering the graph (media element or decoded buffer)
    Source,
    /// Biquad filter
    Filter,
    /// Delay line
    Delay,
    /// Gain stage with a modulatable gain parameter
    Gain,
    /// Sine low-frequency oscillator
    Oscillator,
    /// Final output
    Destination,
}

/// Where a connection lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
    /// The node's audio input
    Input(NodeId),
    /// The gain parameter of a gain node (summed onto its intrinsic value)
    Gain(NodeId),
}

impl Endpoint {
    /// Node the endpoint belongs to
    pub fn node(&self) -> NodeId {
        match self {
            Endpoint::Input(id) | Endpoint::Gain(id) => *id,
        }
    }
}

impl From<NodeId> for Endpoint {
    fn from(id: NodeId) -> Self {
        Endpoint::Input(id)
    }
}

/// A directed connection from a node's output to an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Connection {
    /// Node producing the signal
    pub source: NodeId,
    /// Input or parameter receiving it
    pub target: Endpoint,
}

/// Gain stage
///
/// The effective gain is the intrinsic `value` plus whatever signal is
/// connected to the gain parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainNode {
    /// Intrinsic gain value
    pub value: f32,
}

/// Sine oscillator used as a tremolo LFO
#[derive(Debug, Clone)]
pub struct Oscillator {
    frequency: f32,
    sample_rate: f64,
    phase: f64,
    started: bool,
}

impl Oscillator {
    /// Create a stopped oscillator
    pub fn new(frequency: f32, sample_rate: u32) -> Self {
        Self {
            frequency,
            sample_rate: f64::from(sample_rate.max(1)),
            phase: 0.0,
            started: false,
        }
    }

    /// Start the oscillator. Starting twice has no effect.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Whether `start` was called
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Oscillation rate in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Change the rate; phase is continuous across changes
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = if frequency.is_finite() { frequency } else { 0.0 };
    }

    /// Next output sample (silence until started)
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.started {
            return 0.0;
        }

        let value = (2.0 * std::f64::consts::PI * self.phase).sin() as f32;
        self.phase += f64::from(self.frequency) / self.sample_rate;
        self.phase -= self.phase.floor();
        value
    }
}
