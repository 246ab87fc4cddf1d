//! SVG rendering of the localization search.
//!
//! Draws the query × reference grid with:
//! - Every cell generated by the search
//! - The final path, matched (Real) and hidden steps in separate colors
//!
//! Reference ids run left to right, query ids top to bottom.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::core::{NodeKey, NodeSet, PathElement};
use crate::error::Result;
use crate::localizer::LocalizationObserver;

/// SVG color scheme for visualization
#[derive(Clone, Debug)]
pub struct SvgColorScheme {
    /// Page background
    pub background: &'static str,
    /// Unvisited cells
    pub grid: &'static str,
    /// Cells generated by the search
    pub expanded: &'static str,
    /// Matched path steps
    pub real: &'static str,
    /// Hidden path steps
    pub hidden: &'static str,
}

impl Default for SvgColorScheme {
    fn default() -> Self {
        Self {
            background: "#F8F8F8",
            grid: "#FFFFFF",
            expanded: "#9EC5E8",
            real: "#2222AA",
            hidden: "#AA2222",
        }
    }
}

/// Configuration for SVG rendering
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Cell edge length in pixels
    pub cell_size: f64,
    /// Padding around the grid in pixels
    pub padding: f64,
    /// Color scheme
    pub colors: SvgColorScheme,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            cell_size: 6.0,
            padding: 20.0,
            colors: SvgColorScheme::default(),
        }
    }
}

/// Observer collecting expansions and the final path into an SVG file.
///
/// The file is written when the localizer finishes its run.
pub struct SvgMatrixRenderer {
    config: SvgConfig,
    output: PathBuf,
    query_size: usize,
    ref_size: usize,
    title: Option<String>,
    expanded: BTreeSet<NodeKey>,
    path: Vec<PathElement>,
}

impl SvgMatrixRenderer {
    /// Create a renderer for a `query_size` × `ref_size` grid
    pub fn new(
        output: impl Into<PathBuf>,
        query_size: usize,
        ref_size: usize,
        config: SvgConfig,
    ) -> Self {
        Self {
            config,
            output: output.into(),
            query_size,
            ref_size,
            title: None,
            expanded: BTreeSet::new(),
            path: Vec::new(),
        }
    }

    /// Set a title to display
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of distinct cells generated so far
    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Latest path received, oldest first
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    /// Render to SVG string
    pub fn render(&self) -> Result<String> {
        let mut svg = String::new();
        self.write_svg(&mut svg)?;
        Ok(svg)
    }

    /// Write the rendering to the configured output file
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.output)
    }

    /// Write the rendering to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()?)?;
        info!("[SvgMatrixRenderer] Saved {}", path.display());
        Ok(())
    }

    fn write_svg(&self, svg: &mut String) -> std::fmt::Result {
        let cell = self.config.cell_size;
        let padding = self.config.padding;
        let title_height = if self.title.is_some() { 30.0 } else { 0.0 };
        let legend_height = 30.0;

        let grid_width = self.ref_size as f64 * cell;
        let grid_height = self.query_size as f64 * cell;
        let width = grid_width + 2.0 * padding;
        let height = grid_height + 2.0 * padding + title_height + legend_height;

        writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
            width, height, width, height
        )?;
        writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            self.config.colors.background
        )?;

        if let Some(ref title) = self.title {
            writeln!(
                svg,
                r##"  <text x="{:.0}" y="22" font-family="sans-serif" font-size="16" font-weight="bold" text-anchor="middle" fill="#333">{}</text>"##,
                width / 2.0,
                escape_xml(title)
            )?;
        }

        writeln!(
            svg,
            r#"  <g transform="translate({:.0}, {:.0})">"#,
            padding,
            padding + title_height
        )?;
        writeln!(
            svg,
            r##"    <rect width="{:.1}" height="{:.1}" fill="{}" stroke="#CCCCCC"/>"##,
            grid_width, grid_height, self.config.colors.grid
        )?;

        writeln!(svg, r#"    <g id="expanded">"#)?;
        for key in &self.expanded {
            self.write_cell(svg, key.qu_id, key.ref_id, self.config.colors.expanded)?;
        }
        writeln!(svg, "    </g>")?;

        writeln!(svg, r#"    <g id="path">"#)?;
        for element in &self.path {
            let color = if element.is_hidden() {
                self.config.colors.hidden
            } else {
                self.config.colors.real
            };
            self.write_cell(svg, element.qu_id, element.ref_id, color)?;
        }
        writeln!(svg, "    </g>")?;
        writeln!(svg, "  </g>")?;

        self.write_legend(svg, padding, padding + title_height + grid_height + 20.0)?;
        writeln!(svg, "</svg>")
    }

    fn write_cell(&self, svg: &mut String, qu_id: i32, ref_id: i32, color: &str) -> std::fmt::Result {
        if qu_id < 0 || ref_id < 0 {
            return Ok(());
        }
        let cell = self.config.cell_size;
        writeln!(
            svg,
            r#"      <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            ref_id as f64 * cell,
            qu_id as f64 * cell,
            cell,
            cell,
            color
        )
    }

    fn write_legend(&self, svg: &mut String, x: f64, y: f64) -> std::fmt::Result {
        let colors = &self.config.colors;
        writeln!(svg, r#"  <g id="legend" font-family="sans-serif" font-size="11">"#)?;
        for (i, (label, color)) in [
            ("Expanded", colors.expanded),
            ("Matched", colors.real),
            ("Hidden", colors.hidden),
        ]
        .iter()
        .enumerate()
        {
            let lx = x + i as f64 * 90.0;
            writeln!(
                svg,
                r#"    <rect x="{:.0}" y="{:.0}" width="10" height="10" fill="{}"/>"#,
                lx,
                y - 9.0,
                color
            )?;
            writeln!(
                svg,
                r##"    <text x="{:.0}" y="{:.0}" fill="#333">{}</text>"##,
                lx + 14.0,
                y,
                label
            )?;
        }
        writeln!(svg, "  </g>")
    }
}

/// Escape text content for XML
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl LocalizationObserver for SvgMatrixRenderer {
    fn on_image(&mut self, _qu_id: usize, expanded: &NodeSet, path: &[PathElement]) -> Result<()> {
        self.expanded.extend(expanded.iter().map(|node| node.key()));
        self.path = path.to_vec();
        Ok(())
    }

    fn on_finished(&mut self) -> Result<()> {
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Node, NodeState};

    fn renderer(output: &Path) -> SvgMatrixRenderer {
        SvgMatrixRenderer::new(output, 3, 4, SvgConfig::default()).with_title("Search")
    }

    #[test]
    fn test_collects_expansions_and_path() {
        let mut svg = renderer(Path::new("unused.svg"));
        let expanded: NodeSet = [Node::new(1, 0, 1.0), Node::new(1, 1, 2.0)]
            .into_iter()
            .collect();
        let path = [
            PathElement::new(0, 0, NodeState::Hidden),
            PathElement::new(1, 0, NodeState::Real),
        ];

        svg.on_image(1, &expanded, &path).unwrap();
        svg.on_image(1, &expanded, &path).unwrap();
        assert_eq!(svg.expanded_count(), 2);
        assert_eq!(svg.path(), &path);

        let out = svg.render().unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.trim_end().ends_with("</svg>"));
        assert!(out.contains(">Search</text>"));
        assert!(out.contains(r##"x="0.0" y="6.0" width="6.0" height="6.0" fill="#2222AA""##));
        assert!(out.contains(r##"x="0.0" y="0.0" width="6.0" height="6.0" fill="#AA2222""##));
        assert!(out.contains(r##"x="6.0" y="6.0" width="6.0" height="6.0" fill="#9EC5E8""##));
    }

    #[test]
    fn test_title_is_escaped() {
        let svg = SvgMatrixRenderer::new("unused.svg", 2, 2, SvgConfig::default())
            .with_title("winter & summer <run 2>");
        let out = svg.render().unwrap();

        assert!(out.contains(">winter &amp; summer &lt;run 2&gt;</text>"));
        assert!(!out.contains("winter & summer"));
    }

    #[test]
    fn test_writes_file_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("search.svg");
        let mut svg = renderer(&output);

        svg.on_finished().unwrap();
        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("<svg"));
    }
}
