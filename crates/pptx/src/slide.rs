//! Slide part rendering.
//!
//! Each slide is a solid background plus one centered text box holding one
//! paragraph per lyric line.

use crate::xml::{XmlBuilder, NS_A, NS_P, NS_R};
use lyrics_core::{FontResolver, Result, SlideGroup, StyleConfig};

/// Render the `ppt/slides/slideN.xml` part for a slide group.
pub fn render_slide(
    group: &SlideGroup,
    style: &StyleConfig,
    fonts: &FontResolver,
) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    xml.start("p:cSld", &[])?;

    // Background must come before the shape tree
    let background = style.background_color.to_hex();
    xml.start("p:bg", &[])?;
    xml.start("p:bgPr", &[])?;
    solid_fill(&mut xml, &background)?;
    xml.empty("a:effectLst", &[])?;
    xml.end("p:bgPr")?;
    xml.end("p:bg")?;

    xml.start("p:spTree", &[])?;
    write_group_properties(&mut xml)?;
    write_text_box(&mut xml, group, style, fonts)?;
    xml.end("p:spTree")?;

    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;

    xml.finish()
}

fn solid_fill(xml: &mut XmlBuilder, hex: &str) -> Result<()> {
    xml.start("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", hex)])?;
    xml.end("a:solidFill")?;
    Ok(())
}

/// Required non-visual and transform properties of the shape tree root.
fn write_group_properties(xml: &mut XmlBuilder) -> Result<()> {
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;

    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")?;
    Ok(())
}

fn write_text_box(
    xml: &mut XmlBuilder,
    group: &SlideGroup,
    style: &StyleConfig,
    fonts: &FontResolver,
) -> Result<()> {
    let frame = style.text_frame;
    let x = frame.x.to_string();
    let y = frame.y.to_string();
    let cx = frame.width.to_string();
    let cy = frame.height.to_string();
    let name = format!("Lyrics {}", group.number);

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "2"), ("name", name.as_str())])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.empty("a:noFill", &[])?;
    xml.end("p:spPr")?;

    xml.start("p:txBody", &[])?;
    xml.start(
        "a:bodyPr",
        &[("wrap", "square"), ("rtlCol", "0"), ("anchor", "ctr")],
    )?;
    xml.empty("a:normAutofit", &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;

    for (idx, line) in group.lines.iter().enumerate() {
        write_paragraph(xml, line, idx > 0, style, fonts)?;
    }

    xml.end("p:txBody")?;
    xml.end("p:sp")?;
    Ok(())
}

fn write_paragraph(
    xml: &mut XmlBuilder,
    line: &str,
    space_before: bool,
    style: &StyleConfig,
    fonts: &FontResolver,
) -> Result<()> {
    let choice = fonts.resolve(line);
    let size = style.font_size_centipoints().to_string();
    let bold = if style.bold { "1" } else { "0" };
    let run_props = [
        ("lang", choice.category.language_tag()),
        ("sz", size.as_str()),
        ("b", bold),
        ("dirty", "0"),
    ];

    xml.start("a:p", &[])?;

    xml.start("a:pPr", &[("algn", "ctr")])?;
    let line_spacing = style.line_spacing_percent().to_string();
    xml.start("a:lnSpc", &[])?;
    xml.empty("a:spcPct", &[("val", line_spacing.as_str())])?;
    xml.end("a:lnSpc")?;
    if space_before {
        let spacing = style.paragraph_spacing_centipoints().to_string();
        xml.start("a:spcBef", &[])?;
        xml.empty("a:spcPts", &[("val", spacing.as_str())])?;
        xml.end("a:spcBef")?;
    }
    xml.end("a:pPr")?;

    if line.is_empty() {
        xml.empty("a:endParaRPr", &run_props)?;
    } else {
        let color = style.text_color.to_hex();
        let typeface = choice.typeface.as_str();

        xml.start("a:r", &[])?;
        xml.start("a:rPr", &run_props)?;
        solid_fill(xml, &color)?;
        xml.empty("a:latin", &[("typeface", typeface)])?;
        xml.empty("a:ea", &[("typeface", typeface)])?;
        xml.empty("a:cs", &[("typeface", typeface)])?;
        xml.end("a:rPr")?;
        xml.element("a:t", line)?;
        xml.end("a:r")?;
    }

    xml.end("a:p")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyrics_core::{FontPreferences, ScriptCategory};

    fn render(lines: &[&str], style: &StyleConfig) -> String {
        let group = SlideGroup::new(1, lines.iter().map(|s| s.to_string()).collect());
        render_slide(&group, style, &FontResolver::default()).unwrap()
    }

    #[test]
    fn test_black_background_before_shapes() {
        let xml = render(&["Amazing grace"], &StyleConfig::default());

        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert!(xml.contains(r#"<p:bgPr><a:solidFill><a:srgbClr val="000000"/></a:solidFill>"#));
    }

    #[test]
    fn test_text_box_geometry() {
        let xml = render(&["Amazing grace"], &StyleConfig::default());

        assert!(xml.contains(r#"<a:off x="608076" y="2286000"/>"#));
        assert!(xml.contains(r#"<a:ext cx="10972800" cy="3657600"/>"#));
        assert!(xml.contains(r#"<p:cNvSpPr txBox="1"/>"#));
    }

    #[test]
    fn test_paragraph_style() {
        let xml = render(&["Amazing grace"], &StyleConfig::default());

        assert!(xml.contains(r#"<a:pPr algn="ctr"><a:lnSpc><a:spcPct val="120000"/></a:lnSpc></a:pPr>"#));
        assert!(xml.contains(r#"<a:rPr lang="en-US" sz="3600" b="1" dirty="0">"#));
        assert!(xml.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
        assert!(xml.contains(r#"<a:latin typeface="Calibri"/>"#));
        assert!(xml.contains("<a:t>Amazing grace</a:t>"));
    }

    #[test]
    fn test_second_line_gets_space_before() {
        let xml = render(&["Line one", "Line two"], &StyleConfig::default());

        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert_eq!(xml.matches("<a:spcBef>").count(), 1);
        assert!(xml.contains(r#"<a:spcPts val="1200"/>"#));

        let first = xml.find("Line one").unwrap();
        let spacing = xml.find("<a:spcBef>").unwrap();
        assert!(first < spacing);
    }

    #[test]
    fn test_single_line_has_no_space_before() {
        let xml = render(&["Line three"], &StyleConfig::default());
        assert!(!xml.contains("spcBef"));
    }

    #[test]
    fn test_font_per_line() {
        let xml = render(&["Hallelujah", "नमस्ते"], &StyleConfig::default());

        assert!(xml.contains(r#"<a:latin typeface="Calibri"/>"#));
        assert!(xml.contains(r#"lang="hi-IN""#));
        assert!(xml.contains(r#"<a:cs typeface="Noto Sans Devanagari Bold"/>"#));
    }

    #[test]
    fn test_preferences_and_size() {
        let style = StyleConfig::default().with_font_size(Some(54));
        let fonts = FontResolver::new(
            FontPreferences::new().with_font(ScriptCategory::Telugu, "Gautami"),
        );
        let group = SlideGroup::new(3, vec!["నమస్తే".to_string()]);
        let xml = render_slide(&group, &style, &fonts).unwrap();

        assert!(xml.contains(r#"sz="5400""#));
        assert!(xml.contains(r#"lang="te-IN""#));
        assert!(xml.contains(r#"<a:latin typeface="Gautami"/>"#));
        assert!(xml.contains(r#"name="Lyrics 3""#));
    }

    #[test]
    fn test_lyrics_are_escaped() {
        let xml = render(&["Rock & <roll>"], &StyleConfig::default());
        assert!(xml.contains("<a:t>Rock &amp; &lt;roll&gt;</a:t>"));
    }

    #[test]
    fn test_empty_line_renders_end_paragraph() {
        let xml = render(&[""], &StyleConfig::default());

        assert!(xml.contains("<a:endParaRPr"));
        assert!(!xml.contains("<a:r>"));
    }
}
