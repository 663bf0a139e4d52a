//! Google Docs document body and its plain-text rendering.
//!
//! Only the parts of the Docs API `Document` resource the renderer needs are
//! deserialized; everything else is ignored.

use std::collections::HashMap;

use serde::Deserialize;

/// Points per indentation step.
const INDENT_STEP: f64 = 18.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub paragraph: Option<Paragraph>,
    pub table: Option<Table>,
    pub table_of_contents: Option<TableOfContents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    pub paragraph_style: Option<ParagraphStyle>,
    pub bullet: Option<Bullet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub named_style_type: Option<String>,
    pub indent_start: Option<Dimension>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimension {
    pub magnitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    pub list_id: Option<String>,
    pub nesting_level: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableOfContents {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

impl Document {
    /// Renders the body as markdown-flavoured text.
    pub fn render(&self) -> String {
        let mut renderer = Renderer::default();
        renderer.elements(&self.body.content)
    }
}

/// Keeps the running number of each top-level list across the document.
#[derive(Default)]
struct Renderer {
    list_order: HashMap<String, usize>,
}

impl Renderer {
    fn elements(&mut self, elements: &[StructuralElement]) -> String {
        let mut text = String::new();
        for element in elements {
            if let Some(paragraph) = &element.paragraph {
                self.paragraph(paragraph, &mut text);
            } else if let Some(table) = &element.table {
                for row in &table.table_rows {
                    for cell in &row.table_cells {
                        text.push_str(&self.elements(&cell.content));
                    }
                }
            } else if let Some(toc) = &element.table_of_contents {
                let contents = self.elements(&toc.content);
                text.push_str("  ");
                text.push_str(&contents.split('\n').collect::<Vec<_>>().join("\n  "));
            }
        }
        text
    }

    fn paragraph(&mut self, paragraph: &Paragraph, text: &mut String) {
        if let Some(style) = &paragraph.paragraph_style {
            let indent = style
                .indent_start
                .as_ref()
                .and_then(|dimension| dimension.magnitude)
                .map_or(0, |magnitude| (magnitude / INDENT_STEP).floor() as usize);
            text.push_str(&"  ".repeat(indent));

            text.push_str(match style.named_style_type.as_deref() {
                Some("TITLE") => "#",
                Some("SUBTITLE") => "- ",
                Some("HEADING_1") => "\n# ",
                Some("HEADING_2") => "\n## ",
                Some("HEADING_3") => "### ",
                Some("HEADING_4") => "#### ",
                Some("HEADING_5") => "##### ",
                Some("HEADING_6") => "###### ",
                _ => "",
            });

            if let Some(bullet) = &paragraph.bullet {
                match (&bullet.list_id, bullet.nesting_level) {
                    (Some(list_id), None) => {
                        let order = self.list_order.entry(list_id.clone()).or_insert(0);
                        *order += 1;
                        text.push_str(&format!("{}. ", order));
                    }
                    _ => text.push_str("* "),
                }
            }
        }

        for element in &paragraph.elements {
            if let Some(run) = &element.text_run {
                text.push_str(&run.content);
            }
        }
    }
}
