//! Audio Graph - connection-based routing evaluated frame by frame

use super::biquad::BiquadFilter;
use super::delay::DelayLine;
use super::node::{Connection, Endpoint, GainNode, NodeId, NodeKind, Oscillator};
use std::collections::VecDeque;

enum Node {
    Source,
    Filter(BiquadFilter),
    Delay(DelayLine),
    Gain(GainNode),
    Oscillator(Oscillator),
    Destination,
}

impl Node {
    fn kind(&self) -> NodeKind {
        match self {
            Node::Source => NodeKind::Source,
            Node::Filter(_) => NodeKind::Filter,
            Node::Delay(_) => NodeKind::Delay,
            Node::Gain(_) => NodeKind::Gain,
            Node::Oscillator(_) => NodeKind::Oscillator,
            Node::Destination => NodeKind::Destination,
        }
    }

    fn accepts_input(&self) -> bool {
        !matches!(self, Node::Source | Node::Oscillator(_))
    }
}

/// Audio processing graph
///
/// Nodes are added once and live as long as the graph; only connections
/// change. Every node carries the graph's channel count. Evaluation is
/// sample-accurate: each frame, nodes run in topological order, delay lines
/// first emit their stored output and take their input after every other node
/// has run, which is what makes feedback loops through a delay legal.
pub struct AudioGraph {
    channels: usize,
    sample_rate: u32,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    /// Processing order (rebuilt lazily after connection changes)
    order: Vec<usize>,
    /// Per node: sources summed into its audio input
    inputs: Vec<Vec<usize>>,
    /// Per node: sources summed onto its gain parameter
    modulators: Vec<Vec<usize>>,
    dirty: bool,
    /// Current frame output of every node (`nodes * channels`)
    outputs: Vec<f32>,
    scratch: Vec<f32>,
}

impl AudioGraph {
    /// Create an empty graph
    pub fn new(channels: u16, sample_rate: u32) -> Self {
        let channels = usize::from(channels.max(1));
        Self {
            channels,
            sample_rate,
            nodes: Vec::new(),
            connections: Vec::new(),
            order: Vec::new(),
            inputs: Vec::new(),
            modulators: Vec::new(),
            dirty: true,
            outputs: Vec::new(),
            scratch: vec![0.0; channels],
        }
    }

    /// Channel count of every node
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sample rate the graph runs at
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.outputs.extend(std::iter::repeat(0.0).take(self.channels));
        self.dirty = true;
        id
    }

    /// Add the node through which external audio enters
    pub fn add_source(&mut self) -> NodeId {
        self.add(Node::Source)
    }

    /// Add a biquad filter
    pub fn add_filter(&mut self) -> NodeId {
        let filter = BiquadFilter::new(self.channels, self.sample_rate);
        self.add(Node::Filter(filter))
    }

    /// Add a delay line holding up to `max_delay_secs`
    pub fn add_delay(&mut self, max_delay_secs: f32) -> NodeId {
        let line = DelayLine::new(self.channels, self.sample_rate, max_delay_secs);
        self.add(Node::Delay(line))
    }

    /// Add a gain stage
    pub fn add_gain(&mut self, value: f32) -> NodeId {
        self.add(Node::Gain(GainNode { value }))
    }

    /// Add a (stopped) sine oscillator
    pub fn add_oscillator(&mut self, frequency: f32) -> NodeId {
        let osc = Oscillator::new(frequency, self.sample_rate);
        self.add(Node::Oscillator(osc))
    }

    /// Add an output node
    pub fn add_destination(&mut self) -> NodeId {
        self.add(Node::Destination)
    }

    /// Kind of a node
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id.0).map(Node::kind)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes of the given kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind() == kind).count()
    }

    /// Connect `source`'s output to `target`
    ///
    /// Returns `false` (and changes nothing) when the connection already
    /// exists or is not meaningful: unknown nodes, a destination as source,
    /// an input-less node as target, or a parameter target on a non-gain node.
    pub fn connect(&mut self, source: NodeId, target: impl Into<Endpoint>) -> bool {
        let target = target.into();

        let Some(source_node) = self.nodes.get(source.0) else {
            return false;
        };
        let Some(target_node) = self.nodes.get(target.node().0) else {
            return false;
        };
        if matches!(source_node, Node::Destination) {
            return false;
        }
        let valid_target = match target {
            Endpoint::Input(_) => target_node.accepts_input(),
            Endpoint::Gain(_) => matches!(target_node, Node::Gain(_)),
        };
        if !valid_target {
            return false;
        }

        let connection = Connection { source, target };
        if self.connections.contains(&connection) {
            return false;
        }

        self.connections.push(connection);
        self.dirty = true;
        true
    }

    /// Remove every outgoing connection of `node`
    ///
    /// Returns the number of connections removed.
    pub fn disconnect(&mut self, node: NodeId) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| c.source != node);
        let removed = before - self.connections.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Check for a specific connection
    pub fn is_connected(&self, source: NodeId, target: impl Into<Endpoint>) -> bool {
        let connection = Connection {
            source,
            target: target.into(),
        };
        self.connections.contains(&connection)
    }

    /// All connections, sorted
    pub fn connections(&self) -> Vec<Connection> {
        let mut connections = self.connections.clone();
        connections.sort();
        connections
    }

    /// Filter node access
    pub fn filter(&self, id: NodeId) -> Option<&BiquadFilter> {
        match self.nodes.get(id.0) {
            Some(Node::Filter(filter)) => Some(filter),
            _ => None,
        }
    }

    /// Mutable filter node access
    pub fn filter_mut(&mut self, id: NodeId) -> Option<&mut BiquadFilter> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Filter(filter)) => Some(filter),
            _ => None,
        }
    }

    /// Delay node access
    pub fn delay(&self, id: NodeId) -> Option<&DelayLine> {
        match self.nodes.get(id.0) {
            Some(Node::Delay(line)) => Some(line),
            _ => None,
        }
    }

    /// Mutable delay node access
    pub fn delay_mut(&mut self, id: NodeId) -> Option<&mut DelayLine> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Delay(line)) => Some(line),
            _ => None,
        }
    }

    /// Gain node access
    pub fn gain(&self, id: NodeId) -> Option<&GainNode> {
        match self.nodes.get(id.0) {
            Some(Node::Gain(gain)) => Some(gain),
            _ => None,
        }
    }

    /// Mutable gain node access
    pub fn gain_mut(&mut self, id: NodeId) -> Option<&mut GainNode> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Gain(gain)) => Some(gain),
            _ => None,
        }
    }

    /// Oscillator node access
    pub fn oscillator(&self, id: NodeId) -> Option<&Oscillator> {
        match self.nodes.get(id.0) {
            Some(Node::Oscillator(osc)) => Some(osc),
            _ => None,
        }
    }

    /// Mutable oscillator node access
    pub fn oscillator_mut(&mut self, id: NodeId) -> Option<&mut Oscillator> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Oscillator(osc)) => Some(osc),
            _ => None,
        }
    }

    /// Current processing order (rebuilt if connections changed)
    pub fn processing_order(&mut self) -> Vec<NodeId> {
        self.rebuild_order_if_needed();
        self.order.iter().map(|&i| NodeId(i)).collect()
    }

    fn rebuild_order_if_needed(&mut self) {
        if self.dirty {
            self.rebuild_order();
        }
    }

    /// Recompute adjacency and processing order
    ///
    /// Kahn's algorithm over all connections except those entering a delay
    /// line. Ties resolve to insertion order so the result is deterministic.
    fn rebuild_order(&mut self) {
        let count = self.nodes.len();
        self.inputs = vec![Vec::new(); count];
        self.modulators = vec![Vec::new(); count];

        let mut in_degree = vec![0usize; count];
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];

        for connection in &self.connections {
            let source = connection.source.0;
            let target = connection.target.node().0;

            match connection.target {
                Endpoint::Input(_) => self.inputs[target].push(source),
                Endpoint::Gain(_) => self.modulators[target].push(source),
            }

            if matches!(self.nodes[target], Node::Delay(_)) {
                continue;
            }
            adjacency[source].push(target);
            in_degree[target] += 1;
        }

        let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(count);

        while let Some(index) = queue.pop_front() {
            order.push(index);
            for &next in &adjacency[index] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        // Cycles without a delay line cannot be ordered; run the leftovers
        // last so they still produce (one frame late) output
        if order.len() != count {
            tracing::warn!(
                ordered = order.len(),
                total = count,
                "Cycle without delay detected in audio graph"
            );
            for index in 0..count {
                if !order.contains(&index) {
                    order.push(index);
                }
            }
        }

        self.order = order;
        self.dirty = false;
    }

    /// Process one interleaved frame
    ///
    /// `input` feeds every source node (missing channels read as silence);
    /// `output` receives the sum of all destination nodes.
    pub fn process_frame(&mut self, input: &[f32], output: &mut [f32]) {
        self.rebuild_order_if_needed();
        let channels = self.channels;

        for position in 0..self.order.len() {
            let index = self.order[position];

            self.scratch.fill(0.0);
            if !matches!(self.nodes[index], Node::Delay(_)) {
                for &source in &self.inputs[index] {
                    let start = source * channels;
                    for (acc, value) in self
                        .scratch
                        .iter_mut()
                        .zip(&self.outputs[start..start + channels])
                    {
                        *acc += value;
                    }
                }
            }

            // Parameter inputs are mixed down to the first channel
            let modulation: f32 = self.modulators[index]
                .iter()
                .map(|&source| self.outputs[source * channels])
                .sum();

            let out = &mut self.outputs[index * channels..(index + 1) * channels];
            match &mut self.nodes[index] {
                Node::Source => {
                    for (c, sample) in out.iter_mut().enumerate() {
                        *sample = input.get(c).copied().unwrap_or(0.0);
                    }
                }
                Node::Filter(filter) => {
                    for (c, sample) in out.iter_mut().enumerate() {
                        *sample = filter.process(c, self.scratch[c]);
                    }
                }
                Node::Delay(line) => {
                    for (c, sample) in out.iter_mut().enumerate() {
                        *sample = line.read(c);
                    }
                }
                Node::Gain(gain) => {
                    let effective = gain.value + modulation;
                    for (sample, value) in out.iter_mut().zip(&self.scratch) {
                        *sample = value * effective;
                    }
                }
                Node::Oscillator(osc) => {
                    out.fill(osc.next_sample());
                }
                Node::Destination => {
                    out.copy_from_slice(&self.scratch);
                }
            }
        }

        // Delay lines take their input once everything else has run
        for index in 0..self.nodes.len() {
            if let Node::Delay(line) = &mut self.nodes[index] {
                for c in 0..channels {
                    let value: f32 = self.inputs[index]
                        .iter()
                        .map(|&source| self.outputs[source * channels + c])
                        .sum();
                    line.write(c, value);
                }
                line.advance();
            }
        }

        output.fill(0.0);
        for (index, node) in self.nodes.iter().enumerate() {
            if matches!(node, Node::Destination) {
                let start = index * channels;
                for (acc, value) in output.iter_mut().zip(&self.outputs[start..start + channels]) {
                    *acc += value;
                }
            }
        }
    }

    /// Process a block of interleaved frames
    ///
    /// The block length is `output.len() / channels`; frames beyond the end
    /// of `input` are processed as silence.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let channels = self.channels;
        let silence = vec![0.0; channels];

        for (frame, out) in output.chunks_exact_mut(channels).enumerate() {
            let start = frame * channels;
            let frame_input = input.get(start..start + channels).unwrap_or(&silence);
            self.process_frame(frame_input, out);
        }
    }
}
