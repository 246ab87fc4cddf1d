//! Path files and search visualization.
//!
//! ## SVG Visualization
//!
//! ```rust,ignore
//! use smriti_loc::io::{SvgConfig, SvgMatrixRenderer};
//!
//! let svg = SvgMatrixRenderer::new("search.svg", query_size, ref_size, SvgConfig::default())
//!     .with_title("Winter vs. summer");
//! let mut localizer = OnlineLocalizer::new(manager, config)?.with_observer(Box::new(svg));
//! localizer.run()?; // writes search.svg when done
//! ```

pub mod path_file;
pub mod svg;

pub use path_file::{load_path, read_path};
pub use svg::{SvgColorScheme, SvgConfig, SvgMatrixRenderer};
