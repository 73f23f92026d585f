//! SVG rendering of the link graph
//!
//! Pages are laid out on a grid ten columns wide, in graph order, and drawn
//! as circles whose area grows with the page's out-degree. Every (page, link)
//! pair becomes an edge. Link targets that were never fetched (beyond the
//! depth limit, on another domain, or failed) still get a node of their own,
//! drawn hollow, so every edge has both ends.

use crate::crawler::LinkGraph;
use crate::output::{escape_xml, OutputResult};
use crate::url::resolve_link;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

/// Number of grid columns
const COLUMNS: usize = 10;

/// Width and height of one grid cell in pixels
const CELL_SIZE: f64 = 80.0;

/// A page or link target in the diagram
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    /// Absolute URL, or the raw link when it could not be resolved
    pub url: String,

    /// Number of links recorded for the page (0 for unvisited targets)
    pub out_degree: usize,

    /// Whether the page has an entry in the link graph
    pub visited: bool,

    /// Grid column
    pub column: usize,

    /// Grid row
    pub row: usize,
}

impl DiagramNode {
    fn center(&self) -> (f64, f64) {
        (
            (self.column as f64 + 0.5) * CELL_SIZE,
            (self.row as f64 + 0.5) * CELL_SIZE,
        )
    }

    fn radius(&self) -> f64 {
        (3.0 + 2.5 * (self.out_degree as f64).sqrt()).min(CELL_SIZE / 2.0 - 2.0)
    }
}

/// Node/edge view of a link graph, ready to render
#[derive(Debug, Clone, Default)]
pub struct LinkDiagram {
    nodes: Vec<DiagramNode>,
    edges: Vec<(usize, usize)>,
}

impl LinkDiagram {
    /// Builds the diagram for a link graph
    ///
    /// Raw links are resolved against the page they were found on so that a
    /// relative link and the page it points to share a node.
    pub fn from_graph(graph: &LinkGraph) -> Self {
        let mut diagram = Self::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (url, links) in graph {
            diagram.add_node(&mut index, url, links.len(), true);
        }

        for (url, links) in graph {
            let source = index[url.as_str()];
            let page = Url::parse(url).ok();

            for raw in links {
                let target = page
                    .as_ref()
                    .and_then(|page| resolve_link(page, raw))
                    .map(|resolved| resolved.to_string())
                    .unwrap_or_else(|| raw.clone());

                let target_index = match index.get(&target) {
                    Some(&i) => i,
                    None => diagram.add_node(&mut index, &target, 0, false),
                };
                diagram.edges.push((source, target_index));
            }
        }

        diagram
    }

    fn add_node(
        &mut self,
        index: &mut HashMap<String, usize>,
        url: &str,
        out_degree: usize,
        visited: bool,
    ) -> usize {
        let position = self.nodes.len();
        self.nodes.push(DiagramNode {
            url: url.to_string(),
            out_degree,
            visited,
            column: position % COLUMNS,
            row: position / COLUMNS,
        });
        index.insert(url.to_string(), position);
        position
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    /// Edges as (source, target) indices into [`LinkDiagram::nodes`]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Renders the diagram as a standalone SVG document
    pub fn render_svg(&self) -> String {
        let columns = self.nodes.len().clamp(1, COLUMNS);
        let rows = self.nodes.len().div_ceil(COLUMNS).max(1);
        let width = columns as f64 * CELL_SIZE;
        let height = rows as f64 * CELL_SIZE;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n",
            w = width,
            h = height
        ));
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

        svg.push_str("  <g stroke=\"gray\" stroke-width=\"0.5\">\n");
        for &(from, to) in &self.edges {
            let (x1, y1) = self.nodes[from].center();
            let (x2, y2) = self.nodes[to].center();
            svg.push_str(&format!(
                "    <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\"/>\n",
                x1, y1, x2, y2
            ));
        }
        svg.push_str("  </g>\n");

        svg.push_str("  <g stroke=\"black\" stroke-width=\"0.5\">\n");
        for node in &self.nodes {
            let (cx, cy) = node.center();
            let style = if node.visited {
                "fill=\"lightblue\" fill-opacity=\"0.8\""
            } else {
                "fill=\"white\" stroke-dasharray=\"2,2\""
            };
            svg.push_str(&format!(
                "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" {}><title>{}</title></circle>\n",
                cx,
                cy,
                node.radius(),
                style,
                escape_xml(&node.url)
            ));
        }
        svg.push_str("  </g>\n");

        svg.push_str("</svg>\n");
        svg
    }

    /// Writes the rendered SVG to `output_path`
    pub fn write_svg(&self, output_path: &Path) -> OutputResult<()> {
        let mut file = File::create(output_path)?;
        file.write_all(self.render_svg().as_bytes())?;

        tracing::debug!(
            "Wrote link diagram with {} nodes and {} edges to {}",
            self.nodes.len(),
            self.edges.len(),
            output_path.display()
        );
        Ok(())
    }
}
