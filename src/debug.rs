//! Viewport culling and the debug overlay.

use crate::color::Color;
use crate::context::LayoutContext;
use crate::emit::EmitState;
use crate::math::BoundingBox;
use crate::render_commands::{RenderCommand, RenderData};

const OVERLAY_FILL_Z: i16 = 9998;
const OVERLAY_OUTLINE_Z: i16 = 9999;

const OVERLAY_FILL: Color = Color::rgba(64.0, 180.0, 255.0, 40.0);
const OVERLAY_HOVER_FILL: Color = Color::rgba(255.0, 220.0, 64.0, 70.0);
const OVERLAY_OUTLINE: Color = Color::rgba(255.0, 64.0, 200.0, 200.0);

/// Drops every command whose bounding box lies fully outside
/// `viewport`. Boxes touching the viewport edge are kept. Order is
/// preserved and the filter is idempotent; `ClipEnd` commands carry
/// their opening `Clip`'s box, so a pair is always dropped or kept
/// together.
pub fn cull_render_commands<CustomData>(
    commands: &mut Vec<RenderCommand<CustomData>>,
    viewport: BoundingBox,
) {
    commands.retain(|command| command.bounding_box.intersects(&viewport));
}

impl<CustomData: Clone + Default + std::fmt::Debug> LayoutContext<CustomData> {
    /// Appends one translucent fill and one outline per placed element
    /// after the main stream, the element under the pointer
    /// highlighted.
    pub(crate) fn append_debug_overlay(&self, state: &mut EmitState<CustomData>) {
        for (index, bbox) in self.bounding_boxes.iter().enumerate() {
            let Some(bbox) = *bbox else {
                continue;
            };
            let id = self.elements[index].id;
            let hovered = bbox.contains(self.pointer);
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index: OVERLAY_FILL_Z,
                user_data: 0,
                data: RenderData::Rectangle {
                    color: if hovered {
                        OVERLAY_HOVER_FILL
                    } else {
                        OVERLAY_FILL
                    },
                    corner_radius: Default::default(),
                },
            });
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index: OVERLAY_OUTLINE_Z,
                user_data: 0,
                data: RenderData::Border {
                    color: OVERLAY_OUTLINE,
                    corner_radius: Default::default(),
                    width: crate::config::BorderWidth::all(1.0),
                },
            });
        }
    }
}
