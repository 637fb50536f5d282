//! The flat command stream a backend consumes.
//!
//! `end_layout` lowers the element tree into an ordered `Vec` of
//! [`RenderCommand`]s. Painting them front to back in stream order
//! yields the correct result; `Clip`/`ClipEnd` pairs bracket the
//! commands they scissor and are always balanced.

use crate::color::Color;
use crate::config::{BorderWidth, CornerRadius};
use crate::id::ElementId;
use crate::math::BoundingBox;

/// One draw instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand<CustomData = ()> {
    /// Id of the element that produced this command. Text lines get a
    /// derived per-line id.
    pub id: ElementId,
    pub bounding_box: BoundingBox,
    pub z_index: i16,
    /// The `user_data` from the element's background or text config.
    pub user_data: usize,
    pub data: RenderData<CustomData>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderData<CustomData = ()> {
    Rectangle {
        color: Color,
        corner_radius: CornerRadius,
    },
    Border {
        color: Color,
        corner_radius: CornerRadius,
        width: BorderWidth,
    },
    Text {
        content: String,
        color: Color,
        font_id: u16,
        font_size: u16,
        letter_spacing: u16,
        line_height: f32,
    },
    Image {
        image_id: u32,
        tint: Color,
        corner_radius: CornerRadius,
    },
    Custom {
        data: CustomData,
        color: Color,
        corner_radius: CornerRadius,
    },
    /// Start scissoring to this command's bounding box. `horizontal` /
    /// `vertical` mirror the element's scroll axes.
    Clip {
        horizontal: bool,
        vertical: bool,
    },
    /// Pop the most recent scissor. Carries the same bounding box as
    /// its opening `Clip` so the pair culls together.
    ClipEnd,
}
