//! PDF export
//!
//! Builds a single-column A4 document with the standard Helvetica fonts.
//! Every attraction gets a clickable map link annotation. Text is reduced to
//! ASCII because the standard fonts carry no glyphs beyond Latin-1.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use crate::maps;
use crate::models::TripPlan;
use crate::{Result, TripPlannerError};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
/// Rough Helvetica advance width as a fraction of the font size
const AVG_CHAR_WIDTH: f64 = 0.5;

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

struct Link {
    rect: [i64; 4],
    url: String,
}

#[derive(Default)]
struct Page {
    operations: Vec<Operation>,
    links: Vec<Link>,
}

/// Replace characters the standard fonts cannot show
#[must_use]
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{20B9}' => out.push_str("INR "),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('*'),
            '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap at `width` characters
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        while current.len() > width {
            let rest = current.split_off(width);
            lines.push(std::mem::replace(&mut current, rest));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct PdfWriter {
    pages: Vec<Page>,
    y: i64,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn page(&mut self) -> &mut Page {
        // `pages` starts non-empty and only grows
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn ensure_space(&mut self, height: i64) {
        if self.y - height < MARGIN {
            self.pages.push(Page::default());
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text_line(&mut self, text: &str, font: Font, size: i64, indent: i64) {
        let leading = size + size / 3;
        self.ensure_space(leading);
        self.y -= leading;
        let (x, y) = (MARGIN + indent, self.y);
        let operations = &mut self.page().operations;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), Object::Integer(size)],
        ));
        operations.push(Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        operations.push(Operation::new("ET", vec![]));
    }

    fn paragraph(&mut self, text: &str, font: Font, size: i64, indent: i64) {
        let usable = (PAGE_WIDTH - 2 * MARGIN - indent) as f64;
        let width = (usable / (size as f64 * AVG_CHAR_WIDTH)) as usize;
        for line in wrap(&sanitize(text), width.max(10)) {
            self.text_line(&line, font, size, indent);
        }
    }

    fn heading(&mut self, text: &str) {
        self.gap(8);
        self.paragraph(text, Font::Bold, 14, 0);
    }

    fn link(&mut self, label: &str, url: &str, indent: i64) {
        let size = 10;
        self.text_line(&sanitize(label), Font::Regular, size, indent);
        let x = MARGIN + indent;
        let width = (label.len() as f64 * size as f64 * AVG_CHAR_WIDTH) as i64 + 4;
        let rect = [x, self.y - 2, x + width, self.y + size];
        self.page().links.push(Link {
            rect,
            url: url.to_string(),
        });
    }

    fn gap(&mut self, height: i64) {
        self.y -= height;
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let page_count = self.pages.len();
        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for page in self.pages {
            let content = Content {
                operations: page.operations,
            };
            let encoded = content
                .encode()
                .map_err(|e| TripPlannerError::render(format!("Failed to encode page content: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let annots: Vec<Object> = page
                .links
                .into_iter()
                .map(|link| {
                    let rect = link.rect.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>();
                    let annot_id: ObjectId = doc.add_object(dictionary! {
                        "Type" => "Annot",
                        "Subtype" => "Link",
                        "Rect" => rect,
                        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                        "A" => dictionary! {
                            "S" => "URI",
                            "URI" => Object::string_literal(link.url),
                        },
                    });
                    annot_id.into()
                })
                .collect();

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !annots.is_empty() {
                page_dict.set("Annots", annots);
            }
            kids.push(doc.add_object(page_dict).into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| TripPlannerError::render(format!("Failed to write PDF: {e}")))?;
        debug!("Rendered PDF with {} pages ({} bytes)", page_count, bytes.len());
        Ok(bytes)
    }
}

/// Render a plan as PDF bytes
pub fn render_pdf(plan: &TripPlan) -> Result<Vec<u8>> {
    let prefs = &plan.preferences;
    let cost = &plan.cost;
    let mut w = PdfWriter::new();

    w.paragraph("Travel Itinerary", Font::Bold, 18, 0);
    w.gap(4);
    w.paragraph(&format!("Destination: {}", prefs.destination), Font::Regular, 11, 0);
    w.paragraph(&format!("Days: {}", prefs.days), Font::Regular, 11, 0);
    w.paragraph(
        &format!(
            "Budget: {} | Group: {} | Style: {}",
            prefs.budget_tier,
            prefs.group_type,
            prefs.itinerary_style.as_str()
        ),
        Font::Regular,
        11,
        0,
    );
    if !prefs.interests.is_empty() {
        let interests: Vec<&str> = prefs.interests.iter().map(String::as_str).collect();
        w.paragraph(&format!("Interests: {}", interests.join(", ")), Font::Regular, 11, 0);
    }

    w.heading("Estimated Cost");
    for (label, amount) in [
        ("Attractions", cost.attractions_total),
        ("Hotels", cost.hotel_estimate),
        ("Total", cost.grand_total),
        ("Per day", cost.per_day),
    ] {
        w.paragraph(&format!("{label}: {} {amount:.2}", cost.currency), Font::Regular, 11, 0);
    }

    w.heading("Trip Summary");
    w.paragraph(&plan.summary.summary, Font::Regular, 11, 0);

    if let Some(ref route) = plan.route_hint {
        w.heading("Getting There");
        for line in route.lines().filter(|l| !l.trim().is_empty()) {
            w.paragraph(line, Font::Regular, 11, 0);
        }
    }

    w.heading("Day-wise Itinerary");
    for (i, day) in plan.itinerary.days.iter().enumerate() {
        w.gap(4);
        w.paragraph(&format!("Day {}: {}", day.day, day.title), Font::Bold, 12, 0);
        if day.is_empty() {
            w.paragraph("Free day to explore at your own pace.", Font::Regular, 11, 10);
        }
        for attraction in &day.attractions {
            w.paragraph(
                &format!("- {} ({}, {})", attraction.name, attraction.city, attraction.state),
                Font::Regular,
                11,
                10,
            );
            w.paragraph(
                &format!(
                    "Rating {:.1} | Duration {:.1} hrs | Entry fee {} {:.0}",
                    attraction.rating, attraction.duration_hours, cost.currency, attraction.entry_fee
                ),
                Font::Regular,
                10,
                20,
            );
            w.link("Open in Google Maps", &maps::attraction_map_url(attraction), 20);
        }
        if let Some(url) = maps::day_route_url(day) {
            w.link("View route for this day", &url, 10);
        }
        if let Some(hotels) = plan.hotels.get(i).filter(|h| !h.is_empty()) {
            w.paragraph(&format!("Stay: {}", hotels.join(", ")), Font::Regular, 10, 10);
        }
    }

    if !plan.season_notes.is_empty() {
        w.heading("When to Go");
        for note in &plan.season_notes {
            w.paragraph(&format!("- {note}"), Font::Regular, 11, 0);
        }
    }

    if !plan.summary.tips.is_empty() {
        w.heading("Travel Tips");
        for tip in &plan.summary.tips {
            w.paragraph(&format!("- {tip}"), Font::Regular, 11, 0);
        }
    }

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_plan;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Cost \u{20B9}500 \u{2013} approx"), "Cost INR 500 - approx");
        assert_eq!(sanitize("caf\u{e9}"), "caf?");
        assert_eq!(sanitize("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(wrap("", 10).is_empty());
        assert_eq!(wrap("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_render_pdf_is_loadable() {
        let plan = sample_plan();
        let bytes = render_pdf(&plan).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(!doc.get_pages().is_empty());
    }

    #[test]
    fn test_long_plan_breaks_pages() {
        let mut plan = sample_plan();
        plan.summary.tips = (0..120).map(|i| format!("Tip number {i}")).collect();
        let bytes = render_pdf(&plan).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_links_are_annotated() {
        let plan = sample_plan();
        let mut w = PdfWriter::new();
        for attraction in plan.itinerary.attractions() {
            w.link("map", &maps::attraction_map_url(attraction), 0);
        }
        assert_eq!(w.pages[0].links.len(), plan.itinerary.attraction_count());
        assert!(w.pages[0].links[0].url.starts_with("https://www.google.com/maps/search/"));
    }
}
