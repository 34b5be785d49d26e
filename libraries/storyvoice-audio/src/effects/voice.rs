//! The voice effect graph shared by live preview and bounce

use super::routing::RoutingCategory;
use super::snapshot::ParameterSnapshot;
use crate::graph::{AudioGraph, Connection, Endpoint, NodeId, NodeKind};

/// Construction settings of a voice graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphSettings {
    /// Capacity of the delay line in seconds
    pub max_delay_secs: f32,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_delay_secs: 2.0,
        }
    }
}

/// Handles of the fixed nodes of a voice graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceNodes {
    pub source: NodeId,
    pub filter: NodeId,
    pub delay: NodeId,
    pub feedback: NodeId,
    pub tremolo: NodeId,
    pub lfo: NodeId,
    pub master: NodeId,
    pub destination: NodeId,
}

/// Source, filter, echo loop, tremolo branch and master gain
///
/// All nodes are created once. Selecting an effect writes its parameters and
/// re-wires the switchable connections; the LFO is started at construction
/// and never restarted.
pub struct VoiceGraph {
    graph: AudioGraph,
    nodes: VoiceNodes,
    category: RoutingCategory,
}

impl VoiceGraph {
    /// Build the graph with `normal` routing
    pub fn new(channels: u16, sample_rate: u32, settings: GraphSettings) -> Self {
        let mut graph = AudioGraph::new(channels, sample_rate);
        let defaults = ParameterSnapshot::default();

        let nodes = VoiceNodes {
            source: graph.add_source(),
            filter: graph.add_filter(),
            delay: graph.add_delay(settings.max_delay_secs),
            feedback: graph.add_gain(defaults.preset.feedback),
            tremolo: graph.add_gain(defaults.preset.tremolo_depth),
            lfo: graph.add_oscillator(defaults.preset.tremolo_rate),
            master: graph.add_gain(defaults.master_volume),
            destination: graph.add_destination(),
        };

        // Permanent wiring
        graph.connect(nodes.source, nodes.filter);
        graph.connect(nodes.feedback, nodes.delay);
        graph.connect(nodes.lfo, Endpoint::Gain(nodes.tremolo));
        graph.connect(nodes.master, nodes.destination);

        if let Some(lfo) = graph.oscillator_mut(nodes.lfo) {
            lfo.start();
        }

        let mut voice = Self {
            graph,
            nodes,
            category: RoutingCategory::PlainFilter,
        };
        voice.apply(&defaults);
        voice
    }

    /// Write the snapshot's parameters and re-wire for its routing category
    pub fn apply(&mut self, snapshot: &ParameterSnapshot) {
        self.write_params(snapshot);
        self.rebuild_routing(snapshot.category());
    }

    /// Assign every node parameter from the snapshot without touching routing
    pub fn write_params(&mut self, snapshot: &ParameterSnapshot) {
        let preset = &snapshot.preset;
        let nodes = self.nodes;

        if let Some(filter) = self.graph.filter_mut(nodes.filter) {
            filter.set(preset.filter);
        }
        if let Some(delay) = self.graph.delay_mut(nodes.delay) {
            delay.set_delay_time(preset.delay_time);
        }
        if let Some(feedback) = self.graph.gain_mut(nodes.feedback) {
            feedback.value = preset.feedback;
        }
        if let Some(lfo) = self.graph.oscillator_mut(nodes.lfo) {
            lfo.set_frequency(preset.tremolo_rate);
        }
        if let Some(tremolo) = self.graph.gain_mut(nodes.tremolo) {
            tremolo.value = preset.tremolo_depth;
        }
        if let Some(master) = self.graph.gain_mut(nodes.master) {
            master.value = snapshot.master_volume;
        }
    }

    /// Disconnect filter, delay and tremolo, then wire `category`
    pub fn rebuild_routing(&mut self, category: RoutingCategory) {
        let VoiceNodes {
            filter,
            delay,
            feedback,
            tremolo,
            master,
            ..
        } = self.nodes;
        let graph = &mut self.graph;

        graph.disconnect(filter);
        graph.disconnect(delay);
        graph.disconnect(tremolo);

        match category {
            RoutingCategory::PlainFilter => {
                graph.connect(filter, master);
            }
            RoutingCategory::TremoloOnly => {
                graph.connect(filter, tremolo);
                graph.connect(tremolo, master);
            }
            RoutingCategory::DelayFeedback | RoutingCategory::DelayPlusTremolo { .. } => {
                graph.connect(filter, delay);
                graph.connect(delay, feedback);
                graph.connect(delay, master);
                graph.connect(filter, master);

                if let RoutingCategory::DelayPlusTremolo {
                    tremolo: true,
                    tremolo_taps_delay,
                } = category
                {
                    graph.connect(filter, tremolo);
                    graph.connect(tremolo, master);
                    if tremolo_taps_delay {
                        graph.connect(delay, tremolo);
                    }
                }
            }
        }

        self.category = category;
        tracing::debug!(?category, "Rebuilt voice routing");
    }

    /// Process interleaved frames (see [`AudioGraph::process`])
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        self.graph.process(input, output);
    }

    /// Routing category currently wired
    pub fn category(&self) -> RoutingCategory {
        self.category
    }

    /// Node handles
    pub fn nodes(&self) -> VoiceNodes {
        self.nodes
    }

    /// Underlying graph
    pub fn graph(&self) -> &AudioGraph {
        &self.graph
    }

    /// Current connections, sorted
    pub fn connections(&self) -> Vec<Connection> {
        self.graph.connections()
    }

    /// Number of oscillators in the graph
    pub fn oscillator_count(&self) -> usize {
        self.graph.count(NodeKind::Oscillator)
    }

    /// Channel count
    pub fn channels(&self) -> usize {
        self.graph.channels()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.graph.sample_rate()
    }
}
