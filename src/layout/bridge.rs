use crate::spec::BridgeMapSpec;
use crate::theme::{self, StyleMap};

use super::text::measure_line;
use super::{Dimensions, LabelLayout, Layout, PathLayout, TextAnchor};

/// Bridge map: analogy pairs over/under a horizontal baseline at equal
/// spacing, with `as` separator carets between pairs and the relating
/// factor at the left end.
pub(super) fn layout(spec: &BridgeMapSpec, style: &StyleMap, dims: &Dimensions) -> Layout {
    let font_family = theme::color(style, "fontFamily", "sans-serif");
    let analogy_font = theme::number(style, "analogyFontSize", 14.0);
    let relating_font = theme::number(style, "relatingFontSize", 12.0);
    let line_color = theme::color(style, "lineColor", "#2c3e50");
    let separator_color = theme::color(style, "separatorColor", "#4e79a7");
    let stroke_width = theme::number(style, "strokeWidth", 2.0);
    let text_color = theme::color(style, "analogyTextColor", "#2c3e50");

    let pairs = &spec.analogies;
    let count = pairs.len().max(1) as f32;

    let upper_blocks: Vec<_> = pairs
        .iter()
        .map(|p| measure_line(&p.left, analogy_font, &font_family))
        .collect();
    let lower_blocks: Vec<_> = pairs
        .iter()
        .map(|p| measure_line(&p.right, analogy_font, &font_family))
        .collect();

    let relating_block = measure_line(&spec.relating_factor, relating_font, &font_family);
    let left_margin = dims.padding + relating_block.width + 30.0;

    let widest_pair = upper_blocks
        .iter()
        .zip(&lower_blocks)
        .map(|(u, l)| u.width.max(l.width))
        .fold(60.0_f32, f32::max);
    let slot = (widest_pair + 50.0).max((dims.base_width - left_margin - dims.padding) / count);

    let width = (left_margin + slot * count + dims.padding).max(dims.base_width);
    let line_y = dims.base_height / 2.0;
    let mut layout = Layout::new(crate::spec::DiagramType::BridgeMap, width, dims.base_height);

    // Baseline.
    layout.paths.push(PathLayout {
        d: format!(
            "M {:.2} {:.2} L {:.2} {:.2}",
            dims.padding,
            line_y,
            width - dims.padding,
            line_y
        ),
        stroke: line_color.clone(),
        stroke_width,
        fill: None,
    });

    let mut relating = LabelLayout::new(
        dims.padding,
        line_y - relating_block.height - 6.0,
        relating_block,
        relating_font,
        text_color.clone(),
    );
    relating.anchor = TextAnchor::Start;
    layout.labels.push(relating);

    if let Some(dimension) = &spec.dimension {
        let block = measure_line(dimension, relating_font, &font_family);
        let mut label = LabelLayout::new(
            dims.padding,
            line_y + 10.0,
            block,
            relating_font,
            text_color.clone(),
        );
        label.anchor = TextAnchor::Start;
        label.opacity = 0.7;
        layout.labels.push(label);
    }

    for (idx, (upper, lower)) in upper_blocks.into_iter().zip(lower_blocks).enumerate() {
        let x = left_margin + slot * (idx as f32 + 0.5);
        layout.labels.push(LabelLayout::new(
            x,
            line_y - upper.height - 8.0,
            upper,
            analogy_font,
            text_color.clone(),
        ));
        layout.labels.push(LabelLayout::new(
            x,
            line_y + 12.0,
            lower,
            analogy_font,
            text_color.clone(),
        ));

        // Separator caret between this pair and the next.
        if idx + 1 < pairs.len() {
            let sx = left_margin + slot * (idx as f32 + 1.0);
            layout.paths.push(PathLayout {
                d: format!(
                    "M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2}",
                    sx - 12.0,
                    line_y,
                    sx,
                    line_y - 14.0,
                    sx + 12.0,
                    line_y
                ),
                stroke: separator_color.clone(),
                stroke_width,
                fill: None,
            });
            let as_block = measure_line("as", relating_font, &font_family);
            let mut as_label = LabelLayout::new(
                sx,
                line_y + 8.0,
                as_block,
                relating_font,
                separator_color.clone(),
            );
            as_label.opacity = 0.85;
            layout.labels.push(as_label);
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{DiagramSpec, DiagramType, parse_spec};
    use crate::theme::default_style;
    use serde_json::json;

    fn sample(pairs: usize) -> BridgeMapSpec {
        let analogies: Vec<_> = (0..pairs)
            .map(|i| json!({"left": format!("left {i}"), "right": format!("right {i}")}))
            .collect();
        let value = json!({"relating_factor": "is part of", "analogies": analogies});
        match parse_spec(DiagramType::BridgeMap, &value).unwrap() {
            DiagramSpec::Bridge(spec) => spec,
            _ => unreachable!(),
        }
    }

    #[test]
    fn pairs_are_equally_spaced() {
        let spec = sample(4);
        let style = default_style(DiagramType::BridgeMap);
        let dims = Dimensions::for_kind(DiagramType::BridgeMap);
        let result = layout(&spec, &style, &dims);

        // Upper labels carry the pair x positions (skip relating factor).
        let xs: Vec<f32> = result
            .labels
            .iter()
            .filter(|l| l.text.lines[0].starts_with("left"))
            .map(|l| l.x)
            .collect();
        assert_eq!(xs.len(), 4);
        let gap = xs[1] - xs[0];
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - gap).abs() < 0.5);
        }
    }

    #[test]
    fn separator_count_is_pairs_minus_one() {
        let spec = sample(5);
        let style = default_style(DiagramType::BridgeMap);
        let dims = Dimensions::for_kind(DiagramType::BridgeMap);
        let result = layout(&spec, &style, &dims);
        // Baseline path + 4 separators.
        assert_eq!(result.paths.len(), 5);
    }

    #[test]
    fn only_first_five_pairs_survive_validation() {
        let spec = sample(9);
        assert_eq!(spec.analogies.len(), 5);
    }
}
