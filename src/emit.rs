//! Lowering the sized tree to render commands.
//!
//! Emission runs in two phases. The placement phase walks the trees in
//! declaration order and assigns every element its absolute bounding
//! box, applying child alignment, scroll offsets and floating anchors.
//! The emission phase then walks the trees again, this time sorted by
//! z-index, and writes the command stream: backgrounds before children,
//! scroll containers bracketed by `Clip`/`ClipEnd`, borders last.

use crate::color::Color;
use crate::config::{AlignX, AlignY, FloatingConfig, FloatingTarget};
use crate::context::LayoutContext;
use crate::errors::LayoutError;
use crate::id::element_id_from_parent;
use crate::math::{BoundingBox, Vector2};
use crate::render_commands::{RenderCommand, RenderData};

pub(crate) struct EmitState<CustomData> {
    commands: Vec<RenderCommand<CustomData>>,
    cap: usize,
    overflowed: bool,
}

impl<CustomData> EmitState<CustomData> {
    pub(crate) fn push(&mut self, command: RenderCommand<CustomData>) {
        if self.commands.len() < self.cap {
            self.commands.push(command);
        } else {
            self.overflowed = true;
        }
    }
}

impl<CustomData: Clone + Default + std::fmt::Debug> LayoutContext<CustomData> {
    pub(crate) fn emit_commands(&mut self) -> Vec<RenderCommand<CustomData>> {
        self.bounding_boxes = vec![None; self.elements.len()];

        // Placement walks roots in declaration order so a floating
        // element can anchor to anything declared before it.
        let roots = self.roots.clone();
        for root in &roots {
            if let Some(origin) = self.root_origin(root.element) {
                self.place_subtree(root.element, origin);
            }
        }

        self.roots.sort_by_key(|root| root.z_index);
        let mut state = EmitState {
            commands: Vec::new(),
            cap: self.max_elements * 4,
            overflowed: false,
        };
        let roots = self.roots.clone();
        for root in &roots {
            if self.bounding_boxes[root.element].is_some() {
                self.emit_subtree(root.element, root.z_index, &mut state);
            }
        }
        if self.debug_mode {
            self.append_debug_overlay(&mut state);
        }
        if state.overflowed {
            self.frame_errors.push(LayoutError::ArenaCapacityExceeded {
                max: state.cap,
            });
        }
        state.commands
    }

    /// Top-left corner for a tree root: the viewport origin for the
    /// main tree, the anchor-resolved position for floating roots.
    /// `None` means the floating target does not exist; the subtree is
    /// left unplaced and the error is recorded.
    fn root_origin(&mut self, index: usize) -> Option<Vector2> {
        let Some(floating) = self.elements[index].configs.floating else {
            return Some(Vector2::default());
        };
        let target = self.floating_target_box(index, &floating)?;
        let dimensions = self.elements[index].dimensions;
        let anchor_x = target.x + anchor_fraction_x(floating.target_anchor.0) * target.width;
        let anchor_y = target.y + anchor_fraction_y(floating.target_anchor.1) * target.height;
        Some(Vector2::new(
            anchor_x - anchor_fraction_x(floating.element_anchor.0) * dimensions.width
                + floating.offset.x,
            anchor_y - anchor_fraction_y(floating.element_anchor.1) * dimensions.height
                + floating.offset.y,
        ))
    }

    fn floating_target_box(
        &mut self,
        index: usize,
        floating: &FloatingConfig,
    ) -> Option<BoundingBox> {
        match floating.target {
            FloatingTarget::Root => Some(BoundingBox::from_dimensions(
                Vector2::default(),
                self.viewport,
            )),
            FloatingTarget::Parent => {
                let parent = self.elements[index].parent?;
                match self.bounding_boxes[parent] {
                    Some(placed) => Some(placed),
                    // parent itself unplaced (e.g. inside a failed
                    // floating subtree)
                    None => {
                        self.frame_errors
                            .push(LayoutError::FloatingContainerParentNotFound {
                                id: self.elements[parent].id.id,
                            });
                        None
                    }
                }
            }
            FloatingTarget::Element(id) => {
                let placed = self
                    .element_map
                    .get(&id.id)
                    .filter(|entry| entry.generation == self.generation)
                    .map(|entry| entry.bounding_box);
                if placed.is_none() {
                    self.frame_errors
                        .push(LayoutError::FloatingContainerParentNotFound { id: id.id });
                }
                placed
            }
        }
    }

    /// Assigns `index` and its flow descendants their bounding boxes.
    /// Floating children are skipped; they are their own roots.
    fn place_subtree(&mut self, index: usize, origin: Vector2) {
        let bbox = BoundingBox::from_dimensions(origin, self.elements[index].dimensions);
        self.bounding_boxes[index] = Some(bbox);
        let id = self.elements[index].id;
        let generation = self.generation;
        self.element_map
            .entry(id.id)
            .and_modify(|entry| {
                entry.bounding_box = bbox;
                entry.generation = generation;
            })
            .or_insert(crate::context::MapEntry {
                bounding_box: bbox,
                generation,
            });

        let children = self.elements[index].children.clone();
        if children.is_empty() {
            return;
        }
        let element = &self.elements[index];
        let sizing = element.sizing();
        let padding = element.configs.padding_or_default();
        let x_primary = element.is_primary_axis(true);
        let scroll = self.scroll_offset(id.id);

        let inner_width = bbox.width - padding.left - padding.right;
        let inner_height = bbox.height - padding.top - padding.bottom;
        let mut content_along = element.gap_along(x_primary);
        for &child in &children {
            let dims = self.elements[child].dimensions;
            content_along += if x_primary { dims.width } else { dims.height };
        }
        let inner_along = if x_primary { inner_width } else { inner_height };
        let extra_along = (inner_along - content_along).max(0.0);
        let lead = if x_primary {
            anchor_fraction_x(sizing.align_x) * extra_along
        } else {
            anchor_fraction_y(sizing.align_y) * extra_along
        };

        let mut cursor = if x_primary {
            bbox.x + padding.left + lead
        } else {
            bbox.y + padding.top + lead
        };
        for &child in &children {
            let dims = self.elements[child].dimensions;
            let (child_along, child_cross) = if x_primary {
                (dims.width, dims.height)
            } else {
                (dims.height, dims.width)
            };
            let inner_cross = if x_primary { inner_height } else { inner_width };
            let cross_lead = if x_primary {
                anchor_fraction_y(sizing.align_y) * (inner_cross - child_cross).max(0.0)
            } else {
                anchor_fraction_x(sizing.align_x) * (inner_cross - child_cross).max(0.0)
            };
            let child_origin = if x_primary {
                Vector2::new(cursor, bbox.y + padding.top + cross_lead)
            } else {
                Vector2::new(bbox.x + padding.left + cross_lead, cursor)
            };
            // scroll positions move content the opposite way
            let child_origin = Vector2::new(child_origin.x - scroll.x, child_origin.y - scroll.y);
            self.place_subtree(child, child_origin);
            cursor += child_along + sizing.child_gap;
        }
    }

    fn emit_subtree(&mut self, index: usize, z_index: i16, state: &mut EmitState<CustomData>) {
        let Some(bbox) = self.bounding_boxes[index] else {
            return;
        };
        let element = &self.elements[index];
        let id = element.id;
        let background = element.configs.background.unwrap_or_default();
        let user_data = background.user_data;

        if background.color.is_visible() {
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index,
                user_data,
                data: RenderData::Rectangle {
                    color: background.color,
                    corner_radius: background.corner_radius,
                },
            });
        }
        if let Some(image) = self.elements[index].configs.image {
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index,
                user_data,
                data: RenderData::Image {
                    image_id: image.image_id,
                    tint: if background.color.is_visible() {
                        background.color
                    } else {
                        Color::rgb(255.0, 255.0, 255.0)
                    },
                    corner_radius: background.corner_radius,
                },
            });
        }
        if let Some(custom) = self.elements[index].configs.custom.clone() {
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index,
                user_data,
                data: RenderData::Custom {
                    data: custom,
                    color: background.color,
                    corner_radius: background.corner_radius,
                },
            });
        }
        self.emit_text_lines(index, bbox, z_index, state);

        let scroll_config = self.elements[index].configs.scroll;
        if let Some(scroll) = scroll_config {
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index,
                user_data,
                data: RenderData::Clip {
                    horizontal: scroll.horizontal,
                    vertical: scroll.vertical,
                },
            });
        }

        let children = self.elements[index].children.clone();
        for &child in &children {
            self.emit_subtree(child, z_index, state);
        }
        self.emit_between_children(index, bbox, z_index, state);

        if scroll_config.is_some() {
            state.push(RenderCommand {
                id,
                bounding_box: bbox,
                z_index,
                user_data,
                data: RenderData::ClipEnd,
            });
        }

        if let Some(border) = self.elements[index].configs.border {
            if border.width.has_sides() {
                state.push(RenderCommand {
                    id,
                    bounding_box: bbox,
                    z_index,
                    user_data,
                    data: RenderData::Border {
                        color: border.color,
                        corner_radius: background.corner_radius,
                        width: border.width,
                    },
                });
            }
        }
    }

    fn emit_text_lines(
        &mut self,
        index: usize,
        bbox: BoundingBox,
        z_index: i16,
        state: &mut EmitState<CustomData>,
    ) {
        let element = &self.elements[index];
        let Some(text) = element.text.as_ref() else {
            return;
        };
        let config = element.configs.text.unwrap_or_default();
        let id = element.id;
        let mut y = bbox.y;
        for (line_index, line) in text.lines.iter().enumerate() {
            if !line.content.is_empty() {
                let x = bbox.x
                    + anchor_fraction_x(config.alignment) * (bbox.width - line.dimensions.width);
                state.push(RenderCommand {
                    id: element_id_from_parent(line_index as u32, id.id),
                    bounding_box: BoundingBox::new(
                        x,
                        y,
                        line.dimensions.width,
                        line.dimensions.height,
                    ),
                    z_index,
                    user_data: config.user_data,
                    data: RenderData::Text {
                        content: line.content.clone(),
                        color: config.color,
                        font_id: config.font_id,
                        font_size: config.font_size,
                        letter_spacing: config.letter_spacing,
                        line_height: line.dimensions.height,
                    },
                });
            }
            y += line.dimensions.height;
        }
    }

    /// Rectangles filling the gap between adjacent children, centered
    /// in each gap and spanning the container's full cross axis.
    fn emit_between_children(
        &mut self,
        index: usize,
        bbox: BoundingBox,
        z_index: i16,
        state: &mut EmitState<CustomData>,
    ) {
        let element = &self.elements[index];
        let Some(border) = element.configs.border else {
            return;
        };
        let width = border.width.between_children;
        if width <= 0.0 || !border.color.is_visible() || element.children.len() < 2 {
            return;
        }
        let id = element.id;
        let x_primary = element.is_primary_axis(true);
        let user_data = element.configs.background.unwrap_or_default().user_data;
        let children = element.children.clone();
        let color = border.color;

        for pair in children.windows(2) {
            let (Some(previous), Some(next)) =
                (self.bounding_boxes[pair[0]], self.bounding_boxes[pair[1]])
            else {
                continue;
            };
            let command_box = if x_primary {
                let mid = ((previous.x + previous.width) + next.x) / 2.0;
                BoundingBox::new(mid - width / 2.0, bbox.y, width, bbox.height)
            } else {
                let mid = ((previous.y + previous.height) + next.y) / 2.0;
                BoundingBox::new(bbox.x, mid - width / 2.0, bbox.width, width)
            };
            state.push(RenderCommand {
                id,
                bounding_box: command_box,
                z_index,
                user_data,
                data: RenderData::Rectangle {
                    color,
                    corner_radius: Default::default(),
                },
            });
        }
    }
}

fn anchor_fraction_x(align: AlignX) -> f32 {
    match align {
        AlignX::Left => 0.0,
        AlignX::Center => 0.5,
        AlignX::Right => 1.0,
    }
}

fn anchor_fraction_y(align: AlignY) -> f32 {
    match align {
        AlignY::Top => 0.0,
        AlignY::Center => 0.5,
        AlignY::Bottom => 1.0,
    }
}
