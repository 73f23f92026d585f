//! XML sitemap generation
//!
//! The document follows the sitemaps.org `urlset` layout with one `<url>`
//! element per fetched page. Each page also lists the raw links found on it
//! as `<link>` children.

use crate::crawler::LinkGraph;
use crate::output::{escape_xml, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Namespace of the sitemaps.org protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Writes the link graph as an XML sitemap
///
/// # Arguments
///
/// * `graph` - The crawl's link graph
/// * `output_path` - Path where the XML file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the sitemap
/// * `Err(OutputError)` - Failed to write the file
pub fn write_sitemap_xml(graph: &LinkGraph, output_path: &Path) -> OutputResult<()> {
    let xml = format_sitemap_xml(graph);

    let mut file = File::create(output_path)?;
    file.write_all(xml.as_bytes())?;

    tracing::debug!(
        "Wrote sitemap with {} pages to {}",
        graph.len(),
        output_path.display()
    );
    Ok(())
}

/// Formats the link graph as an XML sitemap document
pub fn format_sitemap_xml(graph: &LinkGraph) -> String {
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));

    for (url, links) in graph {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(url)));
        for link in links {
            xml.push_str(&format!("    <link>{}</link>\n", escape_xml(link)));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
