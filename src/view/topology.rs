use serde::Serialize;

/// Layer sizes of the illustrative network shown on the model tab.
pub const DEFAULT_LAYERS: [usize; 4] = [4, 6, 5, 3];

const LAYER_SPACING: f64 = 150.0;
const NODE_SPACING: f64 = 50.0;
const ORIGIN_X: f64 = 100.0;
const ORIGIN_Y: f64 = 50.0;
const NODE_RADIUS: f64 = 10.0;

/// One neuron in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Node {
    pub id: usize,
    pub layer: usize,
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// A connection from `from` to `to`, by node id. `from` always sits in an earlier layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

/// Static network diagram.
///
/// Every node is connected to every node in every later layer, not just the next one.
/// The diagram depends only on the layer sizes, so it is built once and reused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    pub layers: Vec<usize>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Topology {
    pub fn from_layers(layers: &[usize]) -> Self {
        let nodes: Vec<Node> = layers
            .iter()
            .enumerate()
            .flat_map(|(layer, &size)| (0..size).map(move |index| (layer, index)))
            .enumerate()
            .map(|(id, (layer, index))| Node {
                id,
                layer,
                index,
                x: layer as f64 * LAYER_SPACING + ORIGIN_X,
                y: index as f64 * NODE_SPACING + ORIGIN_Y,
            })
            .collect();

        // Nodes are laid out layer by layer, so later ids never belong to earlier layers.
        let mut edges = Vec::new();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                if a.layer < b.layer {
                    edges.push(Edge { from: a.id, to: b.id });
                }
            }
        }

        Topology { layers: layers.to_vec(), nodes, edges }
    }

    /// Canvas size that fits every node with a margin.
    pub fn extent(&self) -> (f64, f64) {
        let w = self.nodes.iter().map(|n| n.x).fold(0.0, f64::max) + ORIGIN_X;
        let h = self.nodes.iter().map(|n| n.y).fold(0.0, f64::max) + ORIGIN_Y;
        (w, h)
    }

    /// Renders the diagram as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = self.extent();

        let lines: String = self
            .edges
            .iter()
            .map(|e| {
                let (a, b) = (&self.nodes[e.from], &self.nodes[e.to]);
                format!(
                    "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#777\" stroke-width=\"1\"/>\n",
                    a.x, a.y, b.x, b.y
                )
            })
            .collect();

        let circles: String = self
            .nodes
            .iter()
            .map(|n| {
                format!(
                    "<circle class=\"neuron\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"#00ffe1\"><title>layer {} / neuron {}</title></circle>\n",
                    n.x, n.y, NODE_RADIUS, n.layer, n.index
                )
            })
            .collect();

        format!(
            "<svg class=\"topology-svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
             <g class=\"edges\">\n{lines}</g>\n\
             <g class=\"nodes\">\n{circles}</g>\n\
             </svg>"
        )
    }
}

impl Default for Topology {
    fn default() -> Self {
        Topology::from_layers(&DEFAULT_LAYERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_by_two() {
        let t = Topology::from_layers(&[2, 2]);
        assert_eq!(t.nodes.len(), 4);
        assert_eq!(t.edges.len(), 4);
        for e in &t.edges {
            assert_eq!(t.nodes[e.from].layer, 0);
            assert_eq!(t.nodes[e.to].layer, 1);
        }
    }

    #[test]
    fn test_connects_across_skipped_layers() {
        let t = Topology::default();
        assert_eq!(t.nodes.len(), 18);
        // 4*6 + 4*5 + 4*3 + 6*5 + 6*3 + 5*3
        assert_eq!(t.edges.len(), 119);
        assert!(t.edges.iter().all(|e| t.nodes[e.from].layer < t.nodes[e.to].layer));
    }

    #[test]
    fn test_positions() {
        let t = Topology::from_layers(&[1, 3]);
        let last = t.nodes[3];
        assert_eq!((last.layer, last.index), (1, 2));
        assert_eq!((last.x, last.y), (250.0, 150.0));
        assert_eq!(t.extent(), (350.0, 200.0));
    }

    #[test]
    fn test_svg_draws_every_node_and_edge() {
        let t = Topology::from_layers(&[3, 2, 1]);
        let svg = t.to_svg();
        assert_eq!(svg.matches("<circle").count(), 6);
        assert_eq!(svg.matches("<line").count(), t.edges.len());
    }

    #[test]
    fn test_empty_layers() {
        let t = Topology::from_layers(&[]);
        assert!(t.nodes.is_empty());
        assert!(t.edges.is_empty());
    }
}
