//! Loam is an immediate-mode UI layout engine. Every frame the caller
//! rebuilds the element tree through a builder API, and `end_layout`
//! resolves it into a flat list of render commands for whatever
//! backend draws them. Loam itself never touches the GPU, fonts or
//! images.
//!
//! ```no_run
//! use loam::{Config, Dimensions, LayoutContext, SizingAxis, SizingConfig};
//!
//! let mut ctx: LayoutContext = LayoutContext::new();
//! ctx.begin_layout(Dimensions::new(800.0, 600.0));
//! ctx.open_element()?;
//! ctx.configure_element(Config::Sizing(SizingConfig {
//!     width: SizingAxis::grow(),
//!     height: SizingAxis::fixed(48.0),
//!     ..Default::default()
//! }))?;
//! ctx.close_element()?;
//! let frame = ctx.end_layout(None)?;
//! for command in &frame.commands {
//!     // hand off to the renderer
//! }
//! # Ok::<(), loam::LayoutError>(())
//! ```

mod arena;
mod color;
mod config;
mod context;
mod debug;
mod emit;
mod errors;
mod id;
mod math;
mod render_commands;
mod sizing;
mod text;

pub use color::Color;
pub use config::{
    AlignX, AlignY, BackgroundConfig, BorderConfig, BorderWidth, Config, CornerRadius,
    FloatingConfig, FloatingTarget, ImageConfig, LayoutDirection, Padding, ScrollConfig,
    SizingAxis, SizingConfig,
};
pub use context::{LayoutContext, LayoutFrame, ScrollContainerData};
pub use debug::cull_render_commands;
pub use errors::LayoutError;
pub use id::{element_id, element_id_with_index, ElementId};
pub use math::{BoundingBox, Dimensions, Vector2};
pub use render_commands::{RenderCommand, RenderData};
pub use text::{MeasureTextFn, MeasuredWord, TextConfig, TextMeasurement, WrapMode};
