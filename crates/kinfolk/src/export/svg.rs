//! SVG rendering of a positioned chart.
//!
//! The document is drawn back to front: background, parent→child links,
//! marriage links, then one node per placed person.

use std::{collections::HashSet, io};

use log::debug;
use svg::{self, node::element as svg_element};

use kinfolk_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    person::{Person, SpouseStatus},
};

use super::{Error, Exporter};
use crate::{config::StyleConfig, layout::Layout};

const CORNER_RADIUS: f32 = 12.0;
const NODE_STROKE_WIDTH: f32 = 3.0;
const NAME_FONT_SIZE: f32 = 15.0;
const NAME_OFFSET: f32 = -8.0;
const YEAR_FONT_SIZE: f32 = 13.0;
const YEAR_OFFSET: f32 = 10.0;
/// Vertical pull of the parent→child curve's control points.
const LINK_CURVE: f32 = 70.0;
/// Height of the arc drawn between spouses.
const MARRIAGE_ARC: f32 = 30.0;
const MARRIAGE_DASH: &str = "6,4";

/// Builder for [`Svg`] exporters.
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    style: StyleConfig,
    margin: f32,
    min_height: f32,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            margin: 50.0,
            min_height: 0.0,
        }
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Space kept around the chart on every side.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Lower bound for the document height.
    pub fn with_min_height(mut self, min_height: f32) -> Self {
        self.min_height = min_height;
        self
    }

    /// Resolves the configured colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color does not parse.
    pub fn build(self) -> Result<Svg, Error> {
        let style = &self.style;
        let palette = Palette {
            background: style.background_color().map_err(Error::Render)?,
            single: style.single_color().map_err(Error::Render)?,
            married: style.married_color().map_err(Error::Render)?,
            marriage_line: style.marriage_line_color().map_err(Error::Render)?,
            parent_child_line: style.parent_child_line_color().map_err(Error::Render)?,
            text: style.text_color().map_err(Error::Render)?,
        };
        Ok(Svg {
            palette,
            margin: self.margin,
            min_height: self.min_height,
        })
    }
}

#[derive(Debug, Clone)]
struct Palette {
    background: Option<Color>,
    single: Color,
    married: Color,
    marriage_line: Color,
    parent_child_line: Color,
    text: Color,
}

/// SVG exporter with resolved colors.
#[derive(Debug, Clone)]
pub struct Svg {
    palette: Palette,
    margin: f32,
    min_height: f32,
}

impl Svg {
    /// Renders `layout` to an SVG document.
    pub fn render_layout(&self, layout: &Layout<'_>) -> svg::Document {
        let bounds = layout.bounds().unwrap_or_default();
        let view = self.view_box(bounds);
        debug!(
            people = layout.len(),
            width = view.width(),
            height = view.height();
            "Rendering chart"
        );

        let mut doc = svg::Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view.min_x(),
                    view.min_y(),
                    view.width(),
                    view.height()
                ),
            )
            .set("width", view.width())
            .set("height", view.height());

        if let Some(background) = self.palette.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", view.min_x())
                    .set("y", view.min_y())
                    .set("width", view.width())
                    .set("height", view.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc.add(self.draw_parent_links(layout))
            .add(self.draw_marriage_links(layout))
            .add(self.draw_nodes(layout))
    }

    /// Chart bounds grown by the margin, stretched down to the minimum height.
    fn view_box(&self, bounds: Bounds) -> Bounds {
        let top_left = Point::new(bounds.min_x() - self.margin, bounds.min_y() - self.margin);
        let width = bounds.width() + 2.0 * self.margin;
        let height = (bounds.height() + 2.0 * self.margin).max(self.min_height);
        Bounds::new_from_top_left(top_left, Size::new(width, height))
    }

    fn draw_parent_links(&self, layout: &Layout<'_>) -> svg_element::Group {
        let store = layout.store();
        let size = layout.node_size();
        let mut group = svg_element::Group::new().set("class", "parent-links");

        for placed in layout.people() {
            let parents: Vec<Point> = store
                .parents(placed.person())
                .into_iter()
                .filter_map(|parent| layout.position(parent.id()))
                .collect();

            let (start_x, start_y) = match parents.as_slice() {
                [] => continue,
                [parent] => (parent.x() + size.width() / 2.0, parent.y() + size.height()),
                [first, second, ..] => (
                    (first.x() + second.x() + size.width()) / 2.0,
                    first.y().max(second.y()) + size.height(),
                ),
            };
            let end_x = placed.position().x() + size.width() / 2.0;
            let end_y = placed.position().y();

            let data = format!(
                "M {start_x} {start_y} C {start_x} {} {end_x} {} {end_x} {end_y}",
                start_y + LINK_CURVE,
                end_y - LINK_CURVE,
            );
            group = group.add(
                svg_element::Path::new()
                    .set("d", data)
                    .set("stroke", self.palette.parent_child_line.to_string())
                    .set("stroke-width", 2.5)
                    .set("fill", "none"),
            );
        }
        group
    }

    fn draw_marriage_links(&self, layout: &Layout<'_>) -> svg_element::Group {
        let store = layout.store();
        let size = layout.node_size();
        let mut drawn = HashSet::new();
        let mut group = svg_element::Group::new().set("class", "marriage-links");

        for placed in layout.people() {
            let person = placed.person();
            for (spouse, status) in store.spouse_links(person) {
                let Some(spouse_position) = layout.position(spouse.id()) else {
                    continue;
                };
                let (Some(a), Some(b)) = (store.index_of(person.id()), store.index_of(spouse.id()))
                else {
                    continue;
                };
                if !drawn.insert((a.min(b), a.max(b))) {
                    continue;
                }

                let (left, right) = if placed.position().x() <= spouse_position.x() {
                    (placed.position(), spouse_position)
                } else {
                    (spouse_position, placed.position())
                };
                let start_x = left.x() + size.width();
                let start_y = left.y() + size.height() / 2.0;
                let end_x = right.x();
                let end_y = right.y() + size.height() / 2.0;

                let data = format!(
                    "M {start_x} {start_y} Q {} {} {end_x} {end_y}",
                    (start_x + end_x) / 2.0,
                    start_y.min(end_y) - MARRIAGE_ARC,
                );
                group = group.add(self.marriage_path(data, status));
            }
        }
        group
    }

    fn marriage_path(&self, data: String, status: SpouseStatus) -> svg_element::Path {
        let path = svg_element::Path::new()
            .set("d", data)
            .set("class", status.as_str())
            .set("stroke", self.palette.marriage_line.to_string())
            .set("stroke-width", NODE_STROKE_WIDTH)
            .set("fill", "none");
        if status.is_dashed() {
            path.set("stroke-dasharray", MARRIAGE_DASH)
        } else {
            path
        }
    }

    fn draw_nodes(&self, layout: &Layout<'_>) -> svg_element::Group {
        let store = layout.store();
        let mut group = svg_element::Group::new().set("class", "people");
        for placed in layout.people() {
            let married = !store.spouses(placed.person()).is_empty();
            group = group.add(self.draw_node(placed.person(), placed.position(), layout, married));
        }
        group
    }

    fn draw_node(
        &self,
        person: &Person,
        position: Point,
        layout: &Layout<'_>,
        married: bool,
    ) -> svg_element::Group {
        let size = layout.node_size();
        let fill = if married {
            self.palette.married
        } else {
            self.palette.single
        };
        let text_color = self.palette.text.to_string();

        let mut node = svg_element::Group::new()
            .set("class", "person")
            .set("data-id", person.id().to_string())
            .set(
                "transform",
                format!("translate({}, {})", position.x(), position.y()),
            )
            .add(
                svg_element::Rectangle::new()
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("rx", CORNER_RADIUS)
                    .set("fill", fill.to_string())
                    .set("stroke", text_color.clone())
                    .set("stroke-width", NODE_STROKE_WIDTH),
            )
            .add(
                svg_element::Text::new(person.name())
                    .set("x", size.width() / 2.0)
                    .set("y", size.height() / 2.0 + NAME_OFFSET)
                    .set("text-anchor", "middle")
                    .set("fill", text_color.clone())
                    .set("font-size", NAME_FONT_SIZE)
                    .set("font-weight", 600),
            );

        if let Some(lifespan) = person.lifespan() {
            node = node.add(
                svg_element::Text::new(lifespan)
                    .set("x", size.width() / 2.0)
                    .set("y", size.height() / 2.0 + YEAR_OFFSET)
                    .set("text-anchor", "middle")
                    .set("fill", text_color)
                    .set("font-size", YEAR_FONT_SIZE)
                    .set("opacity", 0.9),
            );
        }
        node
    }
}

impl Exporter for Svg {
    fn export_layout(&mut self, layout: &Layout<'_>, out: &mut dyn io::Write) -> Result<(), Error> {
        let doc = self.render_layout(layout);
        svg::write(out, &doc)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use kinfolk_core::{record::PersonRecord, store::RelationshipStore};

    use super::*;
    use crate::layout::Engine;

    fn store() -> RelationshipStore {
        RelationshipStore::from_records([
            PersonRecord::new("1", "John", "1")
                .with_spouse("2", "divorced")
                .with_spouse("3", "married")
                .with_birth_year("1950"),
            PersonRecord::new("2", "Mary", "1").with_spouse("1", "divorced"),
            PersonRecord::new("3", "Anna", "1").with_spouse("1", "married"),
            PersonRecord::new("4", "Rob", "2").with_parents("1", "2"),
            PersonRecord::new("5", "Ned", "2").with_parents("3", ""),
            PersonRecord::new("6", "Solo", "1"),
        ])
    }

    fn render(store: &RelationshipStore) -> String {
        let layout = Engine::new(Size::new(150.0, 70.0)).position_nodes(store, 1340.0);
        SvgBuilder::new()
            .build()
            .unwrap()
            .render_layout(&layout)
            .to_string()
    }

    #[test]
    fn test_one_node_per_placed_person() {
        let svg = render(&store());
        assert_eq!(svg.matches("class=\"person\"").count(), 6);
        assert!(svg.contains("John"));
        assert!(svg.contains("b. 1950"));
    }

    #[test]
    fn test_marriage_links_drawn_once_per_pair() {
        let svg = render(&store());
        assert_eq!(svg.matches("class=\"divorced\"").count(), 1);
        assert_eq!(svg.matches("class=\"married\"").count(), 1);
        assert_eq!(svg.matches("stroke-dasharray").count(), 1);
    }

    #[test]
    fn test_parent_links_for_single_and_double_parents() {
        let svg = render(&store());
        let links = svg
            .split("class=\"marriage-links\"")
            .next()
            .unwrap()
            .matches("<path")
            .count();
        assert_eq!(links, 2);
    }

    #[test]
    fn test_married_and_single_fills_differ() {
        let style: StyleConfig =
            toml::from_str("single_color = \"#000000\"\nmarried_color = \"#ffffff\"").unwrap();
        let store = store();
        let layout = Engine::new(Size::new(150.0, 70.0)).position_nodes(&store, 1340.0);
        let svg = SvgBuilder::new()
            .with_style(&style)
            .build()
            .unwrap()
            .render_layout(&layout)
            .to_string();

        let single = style.single_color().unwrap().to_string();
        let married = style.married_color().unwrap().to_string();
        assert_eq!(svg.matches(&format!("fill=\"{single}\"")).count(), 3);
        assert_eq!(svg.matches(&format!("fill=\"{married}\"")).count(), 3);
    }

    #[test]
    fn test_view_box_respects_margin_and_min_height() {
        let store = RelationshipStore::from_records([PersonRecord::new("1", "Solo", "1")]);
        let layout = Engine::new(Size::new(150.0, 70.0)).position_nodes(&store, 1340.0);
        let svg = SvgBuilder::new()
            .with_margin(10.0)
            .with_min_height(600.0)
            .build()
            .unwrap();

        let view = svg.view_box(layout.bounds().unwrap());
        assert_approx_eq!(f32, view.width(), 170.0);
        assert_approx_eq!(f32, view.height(), 600.0);
        assert_approx_eq!(f32, view.min_x(), 585.0);
    }

    #[test]
    fn test_invalid_color_is_render_error() {
        let style: StyleConfig = toml::from_str("text_color = \"nope\"").unwrap();
        let err = SvgBuilder::new().with_style(&style).build().unwrap_err();
        assert!(matches!(err, Error::Render(msg) if msg.contains("style.text_color")));
    }

    #[test]
    fn test_export_writes_document() {
        let store = store();
        let layout = Engine::new(Size::new(150.0, 70.0)).position_nodes(&store, 1340.0);
        let mut exporter = SvgBuilder::new().build().unwrap();
        let mut out = Vec::new();
        exporter.export_layout(&layout, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.contains("viewBox"));
    }
}
