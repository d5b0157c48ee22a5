use crate::spec::BraceMapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_line;
use super::{Dimensions, LabelLayout, Layout, PathLayout, TextAnchor};

/// Spacing profile picked from the shape of the input. Small maps get
/// generous whitespace, dense ones tighten up so the brace column stays
/// readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Complexity {
    Simple,
    Moderate,
    Complex,
}

fn classify(spec: &BraceMapSpec) -> Complexity {
    let parts = spec.parts.len();
    let max_subparts = spec.parts.iter().map(|p| p.subparts.len()).max().unwrap_or(0);
    let total: usize = parts + spec.parts.iter().map(|p| p.subparts.len()).sum::<usize>();
    if parts <= 3 && max_subparts <= 5 && total <= 15 {
        Complexity::Simple
    } else if parts <= 6 && total <= 30 {
        Complexity::Moderate
    } else {
        Complexity::Complex
    }
}

impl Complexity {
    fn subpart_gap(self) -> f32 {
        match self {
            Complexity::Simple => 12.0,
            Complexity::Moderate => 9.0,
            Complexity::Complex => 6.0,
        }
    }

    fn group_gap_factor(self) -> f32 {
        match self {
            Complexity::Simple => 1.0,
            Complexity::Moderate => 0.7,
            Complexity::Complex => 0.5,
        }
    }
}

/// Left-opening curly brace spanning y0..y1 with its nub at the vertical
/// midpoint, drawn as two mirrored quadratic halves.
fn brace_path(x: f32, y0: f32, y1: f32, depth: f32) -> String {
    let mid = (y0 + y1) / 2.0;
    let r = depth.min((y1 - y0) / 4.0).max(2.0);
    format!(
        "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} \
         Q {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
        x + depth,
        y0,
        x,
        y0,
        x,
        y0 + r,
        x,
        mid - r,
        x,
        mid,
        x - depth,
        mid,
        x,
        mid,
        x,
        mid + r,
        x,
        y1 - r,
        x,
        y1,
        x + depth,
        y1,
    )
}

/// Brace map: whole topic on the left, a large brace splitting it into
/// parts, and per-part braces splitting parts into subparts.
pub(super) fn layout(spec: &BraceMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let topic_font = theme::number(style, "topicFontSize", 24.0);
    let part_font = theme::number(style, "partFontSize", 18.0);
    let subpart_font = theme::number(style, "subpartFontSize", 14.0);
    let brace_color = theme::color(style, "stroke", "#333333");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);
    let text_color = theme::color(style, "partTextColor", "#2c3e50");

    let complexity = classify(spec);
    let subpart_gap = complexity.subpart_gap();

    struct Group {
        part: super::TextBlock,
        subparts: Vec<super::TextBlock>,
        height: f32,
    }
    let groups: Vec<Group> = spec
        .parts
        .iter()
        .map(|part| {
            let part_block = measure_line(&part.name, part_font, &font_family);
            let subparts: Vec<_> = part
                .subparts
                .iter()
                .map(|s| measure_line(&s.name, subpart_font, &font_family))
                .collect();
            let sub_height = subparts.iter().map(|b| b.height).sum::<f32>()
                + subparts.len().saturating_sub(1) as f32 * subpart_gap;
            let height = part_block.height.max(sub_height);
            Group {
                part: part_block,
                subparts,
                height,
            }
        })
        .collect();

    let max_group_height = groups.iter().map(|g| g.height).fold(0.0_f32, f32::max);
    let group_gap = (max_group_height * 0.4).max(60.0) * complexity.group_gap_factor();

    let total_height: f32 = groups.iter().map(|g| g.height).sum::<f32>()
        + groups.len().saturating_sub(1) as f32 * group_gap;
    let top = dims.padding.max((dims.base_height - total_height) / 2.0);
    let cy = top + total_height / 2.0;

    let topic_block = measure_line(&spec.topic, topic_font, &font_family);
    let part_width = groups.iter().map(|g| g.part.width).fold(0.0_f32, f32::max);
    let any_subparts = groups.iter().any(|g| !g.subparts.is_empty());

    let topic_x = dims.padding + topic_block.width / 2.0;
    let main_brace_x = dims.padding + topic_block.width + 40.0;
    let part_x = main_brace_x + 30.0;
    let sub_brace_x = part_x + part_width + 30.0;
    let subpart_x = sub_brace_x + 26.0;

    let mut layout = Layout::new(crate::spec::DiagramType::BraceMap, 0.0, 0.0);
    layout.width = dims.base_width;
    layout.height = (top + total_height + dims.padding).max(dims.base_height);

    let mut topic = LabelLayout::new(
        topic_x,
        cy - topic_block.height / 2.0,
        topic_block,
        topic_font,
        theme::color(style, "topicTextColor", "#2c3e50"),
    );
    topic.bold = true;
    layout.labels.push(topic);

    if total_height > 0.0 {
        layout.paths.push(PathLayout {
            d: brace_path(main_brace_x, top, top + total_height, 14.0),
            stroke: brace_color.clone(),
            stroke_width,
            fill: None,
        });
    }

    let mut max_right = part_x + part_width;
    let mut y = top;
    for group in groups {
        let group_cy = y + group.height / 2.0;
        let part_height = group.part.height;
        let mut part_label = LabelLayout::new(
            part_x,
            group_cy - part_height / 2.0,
            group.part,
            part_font,
            text_color.clone(),
        );
        part_label.anchor = TextAnchor::Start;
        layout.labels.push(part_label);

        if !group.subparts.is_empty() {
            let sub_height = group.subparts.iter().map(|b| b.height).sum::<f32>()
                + group.subparts.len().saturating_sub(1) as f32 * subpart_gap;
            let sub_top = group_cy - sub_height / 2.0;
            layout.paths.push(PathLayout {
                d: brace_path(sub_brace_x, sub_top, sub_top + sub_height, 9.0),
                stroke: brace_color.clone(),
                stroke_width: (stroke_width - 0.5).max(1.0),
                fill: None,
            });
            let mut sy = sub_top;
            for block in group.subparts {
                let height = block.height;
                let right = subpart_x + block.width;
                let mut label = LabelLayout::new(
                    subpart_x,
                    sy,
                    block,
                    subpart_font,
                    theme::color(style, "subpartTextColor", "#2c3e50"),
                );
                label.anchor = TextAnchor::Start;
                layout.labels.push(label);
                max_right = max_right.max(right);
                sy += height + subpart_gap;
            }
        }

        y += group.height + group_gap;
    }

    if any_subparts {
        max_right = max_right.max(subpart_x);
    }
    layout.width = (max_right + dims.padding).max(layout.width);
    layout
}
