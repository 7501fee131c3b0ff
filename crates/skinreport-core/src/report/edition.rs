//! Page tables for each report edition.

use std::path::Path;

use crate::classify::PhotoKind;
use crate::models::report::{Field, Metric};

use super::style::{Color, StyleName};
use super::template::{ImageSource, PageTemplate, TextSource};
use super::{Edition, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

/// Logo shown in every content page header.
pub const LOGO_ASSET: &str = "SkinElementsLogo.jpg";
/// UV/SPF graphic on the UV information page.
pub const UV_RADIATION_ASSET: &str = "UVB-Radiation-SPF.jpg";
/// Ingredient chart on the recommendations page.
pub const INGREDIENTS_ASSET: &str = "Skincare-Ingredients.jpg";

const TILE_TOP: (f32, f32, f32, f32) = (20.0, 129.0, 63.677, 82.0);
const TILE_BOTTOM: (f32, f32, f32, f32) = (20.0, 37.0, 63.677, 82.0);

/// Footer page number for content pages.
///
/// Starts at 1 and advances once per rendered content page; photo pages
/// never touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCounter {
    current: u32,
}

impl PageCounter {
    pub fn new() -> Self {
        Self { current: 1 }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Return the number for the page being drawn and move to the next.
    pub fn advance(&mut self) -> u32 {
        let number = self.current;
        self.current += 1;
        number
    }
}

impl Default for PageCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Edition {
    /// Asset images the edition's templates draw.
    pub fn required_assets(self) -> &'static [&'static str] {
        match self {
            Edition::Complete => &[LOGO_ASSET, UV_RADIATION_ASSET, INGREDIENTS_ASSET],
            Edition::Classic => &[LOGO_ASSET],
        }
    }

    /// Header lines, logo and footer text of a content page.
    pub fn header_footer(self, page_number: u32) -> PageTemplate {
        let (company_x, product_x) = match self {
            Edition::Complete => (26.0, 79.0),
            Edition::Classic => (25.0, 78.0),
        };

        PageTemplate::new()
            .line((20.0, 270.0), (190.0, 270.0), 0.5, Color::PURPLE)
            .line((20.0, 20.0), (190.0, 20.0), 0.5, Color::PURPLE)
            .image((20.0, 274.0, 46.0, 12.451), ImageSource::Asset(LOGO_ASSET))
            .text(
                20.0,
                12.0,
                TextSource::literal(format!("{} |", page_number)),
                StyleName::FooterBlue,
            )
            .literal(company_x, 12.0, " SKIN ELEMENTS LIMITED |", StyleName::FooterPurple)
            .literal(product_x, 12.0, " FACE UV ANALYSIS ", StyleName::FooterBlue)
    }

    /// Full-page photo, with the UV spot count overlaid on UV captures.
    pub fn photo_page(self, path: &Path, kind: PhotoKind) -> PageTemplate {
        let page = PageTemplate::new().image(
            (0.0, 0.0, PAGE_WIDTH_MM, PAGE_HEIGHT_MM),
            ImageSource::Photo(path.to_path_buf()),
        );
        match kind {
            PhotoKind::Uv => page
                .rect((0.0, 0.0, 45.0, 6.0), Color::WHITE, 0.5)
                .text(
                    8.0,
                    1.5,
                    TextSource::Labelled("Feature Count: ", Metric::UvSpots.into()),
                    StyleName::Caption,
                ),
            PhotoKind::Standard => page,
        }
    }

    /// Content pages in print order, without header and footer.
    pub fn content_pages(self) -> Vec<PageTemplate> {
        match self {
            Edition::Complete => complete::pages(),
            Edition::Classic => classic::pages(),
        }
    }
}

/// One analysis block in the right-hand column.
struct Section {
    heading: &'static str,
    label: &'static str,
    metric: Metric,
    intro: &'static str,
    subheading: &'static str,
    detail: &'static str,
}

/// Vertical anchors of the upper and lower analysis blocks.
#[derive(Clone, Copy)]
enum Slot {
    Upper,
    Lower,
}

impl Slot {
    // heading, label/value, first paragraph, subheading, second paragraph
    fn rows(self) -> [f32; 5] {
        match self {
            Slot::Upper => [201.0, 190.0, 170.0, 163.0, 147.0],
            Slot::Lower => [105.0, 95.0, 75.0, 68.0, 52.0],
        }
    }
}

fn title_block(title: &'static str, subtitle: StyleName) -> PageTemplate {
    PageTemplate::new()
        .literal(20.0, 252.0, title, StyleName::Title)
        .literal(20.0, 243.0, "Skin Elements Limited", subtitle)
}

fn patient_block(name_label: &'static str) -> PageTemplate {
    PageTemplate::new()
        .literal(20.0, 228.0, name_label, StyleName::Heading)
        .field(100.0, 228.0, Field::Name, StyleName::Heading)
        .literal(20.0, 222.0, "Analysis Date:", StyleName::SubHeading)
        .field(100.0, 222.0, Field::Date, StyleName::SubHeading)
}

fn section(
    slot: Slot,
    section: &Section,
    label_style: StyleName,
    subheading_style: StyleName,
) -> PageTemplate {
    let [heading, label, intro, subheading, detail] = slot.rows();
    PageTemplate::new()
        .literal(90.0, heading, section.heading, StyleName::ColouredHeading)
        .literal(90.0, label, section.label, label_style)
        .field(170.0, label, section.metric, label_style)
        .paragraph((90.0, intro, 90.0, 30.0), section.intro, StyleName::Body)
        .literal(90.0, subheading, section.subheading, subheading_style)
        .paragraph((90.0, detail, 90.0, 30.0), section.detail, StyleName::Body)
}

mod complete {
    use super::*;

    const SPOTS: Section = Section {
        heading: "Spot Analysis",
        label: "Primary Spots Identified:",
        metric: Metric::Spots,
        intro: "Spots are small areas of concentrated pigment visible on the surface of the skin. \
                They are usually brown or red and vary in size and intensity across the face.",
        subheading: "What This Means:",
        detail: "Most surface spots respond well to a consistent routine of gentle exfoliation, \
                 daily sun protection and targeted brightening ingredients.",
    };

    const WRINKLES: Section = Section {
        heading: "Wrinkle Analysis",
        label: "Wrinkles Identified:",
        metric: Metric::Wrinkles,
        intro: "Wrinkles are furrows and creases that form as skin loses collagen and elasticity. \
                Sun exposure, expression lines and dehydration all contribute to their depth.",
        subheading: "What This Means:",
        detail: "Hydration, barrier support and ingredients that encourage collagen renewal help \
                 soften fine lines and slow the formation of new ones.",
    };

    const TEXTURE: Section = Section {
        heading: "Texture Analysis",
        label: "Texture Abnormalities:",
        metric: Metric::Texture,
        intro: "Texture measures the smoothness of the skin surface. Raised or uneven areas \
                scatter light and can make the complexion look dull.",
        subheading: "What This Means:",
        detail: "Regular, gentle resurfacing and a lightweight moisturiser even out the skin \
                 surface and restore a more uniform reflection of light.",
    };

    const PORES: Section = Section {
        heading: "Pore Analysis",
        label: "Enlarged Pores:",
        metric: Metric::Pores,
        intro: "Pores are the surface openings of sweat glands and hair follicles. Excess oil \
                and reduced elasticity make them appear larger, especially around the nose.",
        subheading: "What This Means:",
        detail: "Keeping pores clear with a balanced cleansing routine and oil regulating \
                 ingredients reduces their visible size over time.",
    };

    const UV_SPOTS: Section = Section {
        heading: "UV Damage",
        label: "UV Spots Identified:",
        metric: Metric::UvSpots,
        intro: "UV spots sit below the surface of the skin and are only visible under \
                ultraviolet light. They are early signs of sun damage that may surface later.",
        subheading: "Choosing a Sunscreen:",
        detail: "Pick a broad spectrum product rated SPF 30 or higher, apply it generously every \
                 morning and reapply after swimming or prolonged time outdoors.",
    };

    const BROWN_SPOTS: Section = Section {
        heading: "Brown Spot Analysis",
        label: "Brown Spots Identified:",
        metric: Metric::BrownSpots,
        intro: "Brown spots are deeper deposits of melanin, such as freckles, age spots and \
                uneven pigmentation, that build up with repeated sun exposure.",
        subheading: "Protecting Your Skin:",
        detail: "Daily SPF prevents existing brown spots from darkening, while vitamin C and \
                 niacinamide help fade them gradually.",
    };

    const RED_AREAS: Section = Section {
        heading: "Red Area Analysis",
        label: "Red Areas Identified:",
        metric: Metric::RedAreas,
        intro: "Red areas reveal inflammation, sensitivity or visible blood vessels close to \
                the surface of the skin.",
        subheading: "Ingredients To Look For:",
        detail: "Soothing ingredients such as centella, allantoin and azelaic acid calm redness \
                 and strengthen a reactive skin barrier.",
    };

    const PORPHYRINS: Section = Section {
        heading: "Porphyrin Analysis",
        label: "Porphyrins Identified:",
        metric: Metric::Porphyrins,
        intro: "Porphyrins are produced by bacteria living in the pores. High counts are linked \
                to congestion and a tendency towards breakouts.",
        subheading: "Ingredients To Look For:",
        detail: "Salicylic acid keeps pores clear and zinc helps balance oil production, \
                 reducing the conditions these bacteria thrive in.",
    };

    const UV_INFORMATION: &str = "Ultraviolet radiation reaches the skin every day, in every season \
        and through cloud cover. UVB rays burn the surface of the skin while UVA rays travel \
        deeper and break down the collagen that keeps skin firm. Over time this exposure shows \
        up as spots, uneven tone and wrinkles. The UV photographs in this report show damage \
        that is not yet visible to the naked eye, giving you the chance to protect your skin \
        before it surfaces.";

    const SPF_INFORMATION: &str = "SPF measures how well a sunscreen protects against UVB. \
        SPF 30 filters around 97 percent of UVB rays and SPF 50 around 98 percent, but no \
        product blocks them all. Broad spectrum formulas also protect against UVA.";

    const INGREDIENT_INFORMATION: &str = "The right ingredients make the biggest difference when \
        they are matched to what your analysis shows. The chart below summarises the actives \
        we recommend for the concerns identified in your session.";

    const RECOMMENDATION: &str = "Based on your analysis we recommend a simple daily routine: \
        a gentle cleanser, a targeted serum chosen for your highest scoring concern, a \
        moisturiser suited to your skin type and a broad spectrum SPF 30 or higher every \
        morning. Book a follow up analysis in three months to measure your progress against \
        the results recorded in this report.";

    const NEXT_STEPS: &str = "Your skin specialist will talk you through these results and \
        tailor the routine to your lifestyle. Bring this report to your next appointment so \
        your progress can be compared session by session.";

    fn analysis_page(title: &'static str, tiles: [(u32, u32); 2], upper: &Section, lower: &Section) -> PageTemplate {
        let [(top_column, top_row), (bottom_column, bottom_row)] = tiles;
        title_block(title, StyleName::SubTitle)
            .extend(patient_block("Patient Name:"))
            .tile(TILE_TOP, top_column, top_row)
            .tile(TILE_BOTTOM, bottom_column, bottom_row)
            .extend(section(Slot::Upper, upper, StyleName::SubHeading, StyleName::SubHeading))
            .extend(section(Slot::Lower, lower, StyleName::SubHeading, StyleName::SubHeading))
    }

    fn uv_information_page() -> PageTemplate {
        title_block("Important UV Information", StyleName::SubTitle)
            .literal(20.0, 228.0, "How UV Light Affects Your Skin", StyleName::Heading)
            .paragraph((20.0, 180.0, 70.0, 30.0), UV_INFORMATION, StyleName::Body)
            .image((100.0, 175.0, 87.37, 46.443), ImageSource::Asset(UV_RADIATION_ASSET))
    }

    fn spf_page() -> PageTemplate {
        title_block("Sun Protection", StyleName::SubTitle)
            .literal(20.0, 228.0, "Understanding SPF", StyleName::Heading)
            .paragraph((20.0, 209.0, 170.0, 15.0), SPF_INFORMATION, StyleName::Body)
            .tile(TILE_TOP, 0, 1)
            .tile(TILE_BOTTOM, 1, 1)
            .extend(section(Slot::Upper, &UV_SPOTS, StyleName::SubHeading, StyleName::SubHeading))
            .extend(section(Slot::Lower, &BROWN_SPOTS, StyleName::SubHeading, StyleName::SubHeading))
    }

    fn ingredients_page() -> PageTemplate {
        title_block("Ingredient Recommendations", StyleName::SubTitle)
            .literal(20.0, 228.0, "Targeted Actives", StyleName::Heading)
            .paragraph((20.0, 209.0, 170.0, 15.0), INGREDIENT_INFORMATION, StyleName::Body)
            .tile(TILE_TOP, 2, 1)
            .tile(TILE_BOTTOM, 3, 1)
            .extend(section(Slot::Upper, &RED_AREAS, StyleName::SubHeading, StyleName::SubHeading))
            .extend(section(Slot::Lower, &PORPHYRINS, StyleName::SubHeading, StyleName::SubHeading))
            .image((90.0, 24.0, 90.0, 22.0), ImageSource::Asset(INGREDIENTS_ASSET))
    }

    fn recommendation_page() -> PageTemplate {
        let mut page = title_block("Our Recommendation", StyleName::SubTitle)
            .extend(patient_block("Patient Name:"))
            .literal(20.0, 205.0, "Results Summary", StyleName::ColouredHeading);

        for (row, metric) in Metric::ALL.into_iter().enumerate() {
            let y = 195.0 - 8.0 * row as f32;
            page = page
                .text(20.0, y, TextSource::literal(format!("{}:", metric.label())), StyleName::SubHeading)
                .field(70.0, y, metric, StyleName::SubHeading);
        }

        page.literal(100.0, 205.0, "Your Routine", StyleName::ColouredHeading)
            .paragraph((100.0, 140.0, 90.0, 60.0), RECOMMENDATION, StyleName::Body)
            .literal(100.0, 120.0, "Next Steps", StyleName::ColouredHeading)
            .paragraph((100.0, 75.0, 90.0, 40.0), NEXT_STEPS, StyleName::Body)
    }

    pub(super) fn pages() -> Vec<PageTemplate> {
        vec![
            analysis_page("UV Face Analysis", [(0, 0), (1, 0)], &SPOTS, &WRINKLES),
            analysis_page("UV Face Analysis", [(2, 0), (3, 0)], &TEXTURE, &PORES),
            uv_information_page(),
            spf_page(),
            ingredients_page(),
            recommendation_page(),
        ]
    }
}

mod classic {
    use super::*;

    const FILLER: &str = "We want to empower people with comprehensive knowledge about what \
        they apply to their skin. power people with power people with e want to comprehensive.";

    const INFO: &str = "We want to empower people with comprehensive knowledge about what they \
        apply to their skin. power people with power people with e want to comprehensive. We \
        want to empower people with comprehensive knowledge about what they apply to their \
        skin. power people with power people with e want to comprehensive. We want to empower \
        people with comprehensive knowledge about what they apply to their skin. power people \
        with power people with e want to comprehensive. We want to empower people with \
        comprehensive knowledge about what they apply to their skin. power people with power \
        people with e want to comprehensive.";

    const fn section(heading: &'static str, label: &'static str, metric: Metric) -> Section {
        Section {
            heading,
            label,
            metric,
            intro: FILLER,
            subheading: "Subheading Goes Here:",
            detail: FILLER,
        }
    }

    fn analysis_page(tiles: [(u32, u32); 2], upper: Section, lower: Section) -> PageTemplate {
        let [(top_column, top_row), (bottom_column, bottom_row)] = tiles;
        title_block("UV Face Analysis", StyleName::SubTitleItalic)
            .extend(patient_block("Paitent Name:"))
            .tile(TILE_TOP, top_column, top_row)
            .tile(TILE_BOTTOM, bottom_column, bottom_row)
            .extend(super::section(Slot::Upper, &upper, StyleName::AnalysisLabel, StyleName::Remark))
            .extend(super::section(Slot::Lower, &lower, StyleName::AnalysisLabel, StyleName::Remark))
    }

    pub(super) fn pages() -> Vec<PageTemplate> {
        vec![
            analysis_page(
                [(0, 0), (1, 0)],
                section("Spot Analysis", "Primary Spots Identified:", Metric::Spots),
                section("Wrinkle Analysis", "Wrinkles Identified:", Metric::Wrinkles),
            ),
            analysis_page(
                [(2, 0), (3, 0)],
                section("Texture Analysis", "Texture Abnormalities:", Metric::Texture),
                section("Pore Analysis", "Enlarged Pores:", Metric::Pores),
            ),
            title_block("Important UV Information", StyleName::SubTitleItalic)
                .literal(20.0, 228.0, "Heading Goes Here", StyleName::Heading)
                .paragraph((90.0, 75.0, 90.0, 30.0), INFO, StyleName::Body),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::template::DrawCommand;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_counter() {
        let mut counter = PageCounter::new();
        assert_eq!(counter.advance(), 1);
        assert_eq!(counter.advance(), 2);
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn test_page_counts() {
        assert_eq!(Edition::Complete.content_pages().len(), 6);
        assert_eq!(Edition::Classic.content_pages().len(), 3);
    }

    #[test]
    fn test_first_pages_use_top_row_tiles() {
        for edition in [Edition::Complete, Edition::Classic] {
            let pages = edition.content_pages();
            assert_eq!(pages[0].tiles().collect::<Vec<_>>(), vec![(0, 0), (1, 0)]);
            assert_eq!(pages[1].tiles().collect::<Vec<_>>(), vec![(2, 0), (3, 0)]);
        }
    }

    #[test]
    fn test_every_metric_is_reported() {
        let fields: Vec<Field> = Edition::Complete
            .content_pages()
            .iter()
            .flat_map(|page| page.fields().collect::<Vec<_>>())
            .collect();
        for metric in Metric::ALL {
            assert!(fields.contains(&Field::Metric(metric)), "{} missing", metric);
        }
    }

    #[test]
    fn test_footer_offsets() {
        let x_of = |page: &PageTemplate, needle: &str| {
            page.commands.iter().find_map(|command| match command {
                DrawCommand::Text { x, text: TextSource::Literal(text), .. } if text == needle => Some(*x),
                _ => None,
            })
        };

        let complete = Edition::Complete.header_footer(4);
        assert_eq!(x_of(&complete, "4 |"), Some(20.0));
        assert_eq!(x_of(&complete, " SKIN ELEMENTS LIMITED |"), Some(26.0));
        assert_eq!(x_of(&complete, " FACE UV ANALYSIS "), Some(79.0));

        let classic = Edition::Classic.header_footer(1);
        assert_eq!(x_of(&classic, " SKIN ELEMENTS LIMITED |"), Some(25.0));
        assert_eq!(x_of(&classic, " FACE UV ANALYSIS "), Some(78.0));
    }

    #[test]
    fn test_photo_pages() {
        let path = Path::new("files/Image_1.jpg");

        let standard = Edition::Complete.photo_page(path, PhotoKind::Standard);
        assert_eq!(standard.commands.len(), 1);

        let uv = Edition::Complete.photo_page(path, PhotoKind::Uv);
        assert_eq!(uv.commands.len(), 3);
        assert_eq!(
            uv.commands[1],
            DrawCommand::Rect {
                x: 0.0,
                y: 0.0,
                width: 45.0,
                height: 6.0,
                color: Color::WHITE,
                opacity: 0.5,
            }
        );
        assert!(matches!(
            &uv.commands[2],
            DrawCommand::Text { x, y, style: StyleName::Caption, .. } if *x == 8.0 && *y == 1.5
        ));
    }
}
