#![forbid(unsafe_code)]

//! Loads tab-separated variant tables and plots one attribute against
//! another, one series per file.

pub mod config;
pub mod controller;
pub mod error;
pub mod plot;
pub mod record;
pub mod registry;
pub mod render;
pub mod selection;

pub use config::ExplorerConfig;
pub use controller::{
    BatchResult, BatchStart, Explorer, FileSource, LoadBatch, LoadOutcome, LoadReport,
    StatusLevel, StatusMessage,
};
pub use error::{ExplorerError, InvalidAttributeError, LoadError, ParseError};
pub use plot::{PlottedChart, SvgSurface, draw_scatter};
pub use record::{Cell, Dataset, Header, Record, Table};
pub use registry::DatasetRegistry;
pub use render::{
    ChartSurface, Color, Point, RenderOutcome, RenderResult, Renderer, ScatterPlot, Series,
    Tooltip, build_scatter,
};
pub use selection::{Axes, Role, Selection};
