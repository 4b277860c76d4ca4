use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{PipelineError, Result};
use crate::models::{DecisionRecord, ABSENT_MARKER};

const DECISION: &[u8] = b"ep-appeal-decision";
const BIB_DATA: &[u8] = b"ep-appeal-bib-data";
const DISTRIBUTION_CODE: &[u8] = b"ep-distribution-code";
const HEADNOTE: &[u8] = b"ep-headnote";
const CATCHWORD: &[u8] = b"ep-catchword";
const PARAGRAPH: &[u8] = b"p";
const CASE_NUM: &[u8] = b"ep-case-num";
const COUNTRY: &[u8] = b"country";
const APPEAL_NUM: &[u8] = b"ep-appeal-num";
const YEAR: &[u8] = b"ep-year";

/// Separator between language blocks of one headnote or catchword
pub const BLOCK_SEPARATOR: &str = " | ";

/// Parse a decisions XML file into one record per decision element
pub fn parse_decisions_file(path: &Path) -> Result<Vec<DecisionRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_decisions_xml(&content)
}

/// Parse a decisions XML document into one record per decision element.
///
/// Decisions are found at any depth and returned in the document order of
/// their start tags. Missing sub-elements become absent fields; a document
/// that is not well-formed fails as a whole.
pub fn parse_decisions_xml(xml: &str) -> Result<Vec<DecisionRecord>> {
    let mut parser = DecisionParser::default();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                parser.handle_open(e, position)?;
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing tag: fire open + close
                parser.handle_open(e, position)?;
                parser.handle_close();
            }
            Ok(Event::End(_)) => {
                parser.handle_close();
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| xml_error(reader.buffer_position() as u64, err))?;
                parser.handle_text(&text);
            }
            Ok(Event::CData(ref e)) => {
                parser.handle_text(&String::from_utf8_lossy(e));
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(xml_error(reader.error_position() as u64, err)),
            _ => {}
        }
        buf.clear();
    }

    parser.finish(reader.buffer_position() as u64)
}

fn xml_error(position: u64, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Xml {
        position,
        message: err.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Headnote,
    Catchword,
}

/// One language variant of a headnote or catchword
#[derive(Debug)]
struct TextBlock {
    kind: BlockKind,
    lang: String,
    depth: usize,
    open: bool,
    paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    DistributionCode,
    Paragraph(usize),
    Country,
    AppealNumber,
    Year,
}

/// Text being collected for one field of one open decision
#[derive(Debug)]
struct Capture {
    decision: usize,
    field: Field,
    depth: usize,
    text: String,
}

/// Open child element of a decision whose direct children are read
#[derive(Debug, Default)]
struct Container {
    seen: bool,
    open_at: Option<usize>,
}

impl Container {
    /// Claim the first occurrence only
    fn open(&mut self, depth: usize) -> bool {
        if self.seen {
            return false;
        }
        self.seen = true;
        self.open_at = Some(depth);
        true
    }

    fn is_parent_of(&self, depth: usize) -> bool {
        self.open_at == Some(depth - 1)
    }

    fn close(&mut self, depth: usize) {
        if self.open_at == Some(depth) {
            self.open_at = None;
        }
    }
}

#[derive(Debug)]
struct DecisionBuilder {
    slot: usize,
    depth: usize,
    reference: Option<String>,
    bib_data: Container,
    case_num: Container,
    record: DecisionRecord,
    blocks: Vec<TextBlock>,
}

impl DecisionBuilder {
    fn new(slot: usize, depth: usize) -> Self {
        Self {
            slot,
            depth,
            reference: None,
            bib_data: Container::default(),
            case_num: Container::default(),
            record: DecisionRecord::new(ABSENT_MARKER),
            blocks: Vec::new(),
        }
    }

    fn open_block_at(&self, depth: usize) -> Option<usize> {
        self.blocks
            .iter()
            .rposition(|b| b.open && b.depth == depth)
    }

    fn build(mut self) -> DecisionRecord {
        if let Some(reference) = self.reference.take() {
            self.record.reference = reference;
        }
        let (headnote, headnote_language) = combine_blocks(&self.blocks, BlockKind::Headnote);
        let (catchword, catchword_language) = combine_blocks(&self.blocks, BlockKind::Catchword);
        self.record.headnote = headnote;
        self.record.headnote_language = headnote_language;
        self.record.catchword = catchword;
        self.record.catchword_language = catchword_language;
        self.record
    }
}

/// Join the blocks of one kind into `[LANG] text | [LANG] text` and their
/// distinct language tags; both absent when there are no blocks
fn combine_blocks(blocks: &[TextBlock], kind: BlockKind) -> (Option<String>, Option<String>) {
    let blocks: Vec<&TextBlock> = blocks.iter().filter(|b| b.kind == kind).collect();
    if blocks.is_empty() {
        return (None, None);
    }

    let text = blocks
        .iter()
        .map(|b| format!("[{}] {}", b.lang, b.paragraphs.join(" ")))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR);

    let mut languages: Vec<&str> = Vec::new();
    for block in &blocks {
        if !languages.contains(&block.lang.as_str()) {
            languages.push(&block.lang);
        }
    }

    (Some(text), Some(languages.join(", ")))
}

#[derive(Debug, Default)]
struct DecisionParser {
    depth: usize,
    seen_root: bool,
    open: Vec<DecisionBuilder>,
    captures: Vec<Capture>,
    slots: Vec<Option<DecisionRecord>>,
}

impl DecisionParser {
    fn handle_open(&mut self, e: &BytesStart, position: u64) -> Result<()> {
        if self.depth == 0 && self.seen_root {
            return Err(xml_error(position, "multiple root elements"));
        }
        self.seen_root = true;
        self.depth += 1;
        let depth = self.depth;

        let name = e.name();
        let name = name.as_ref();

        if name == DECISION {
            let slot = self.slots.len();
            self.slots.push(None);
            self.open.push(DecisionBuilder::new(slot, depth));
            return Ok(());
        }

        for index in 0..self.open.len() {
            match name {
                BIB_DATA => {
                    if self.open[index].bib_data.open(depth) {
                        let reference = attribute(e, "reference", position)?;
                        self.open[index].reference =
                            Some(reference.unwrap_or_else(|| ABSENT_MARKER.to_string()));
                    }
                }
                DISTRIBUTION_CODE => {
                    let builder = &self.open[index];
                    if builder.bib_data.is_parent_of(depth) && builder.record.distribution_code.is_none() {
                        self.capture(index, Field::DistributionCode, depth);
                    }
                }
                HEADNOTE | CATCHWORD => {
                    let kind = if name == HEADNOTE {
                        BlockKind::Headnote
                    } else {
                        BlockKind::Catchword
                    };
                    let lang = attribute(e, "lang", position)?
                        .unwrap_or_else(|| ABSENT_MARKER.to_string())
                        .to_uppercase();
                    self.open[index].blocks.push(TextBlock {
                        kind,
                        lang,
                        depth,
                        open: true,
                        paragraphs: Vec::new(),
                    });
                }
                PARAGRAPH => {
                    if let Some(block) = self.open[index].open_block_at(depth - 1) {
                        self.capture(index, Field::Paragraph(block), depth);
                    }
                }
                CASE_NUM => {
                    if self.open[index].case_num.open(depth) {
                        self.open[index].record.case_code = attribute(e, "code", position)?;
                    }
                }
                COUNTRY | APPEAL_NUM | YEAR => {
                    let builder = &self.open[index];
                    if !builder.case_num.is_parent_of(depth) {
                        continue;
                    }
                    let (field, current) = match name {
                        COUNTRY => (Field::Country, &builder.record.country),
                        APPEAL_NUM => (Field::AppealNumber, &builder.record.appeal_number),
                        _ => (Field::Year, &builder.record.year),
                    };
                    if current.is_none() {
                        self.capture(index, field, depth);
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn capture(&mut self, decision: usize, field: Field, depth: usize) {
        self.captures.push(Capture {
            decision,
            field,
            depth,
            text: String::new(),
        });
    }

    fn handle_text(&mut self, text: &str) {
        for capture in &mut self.captures {
            capture.text.push_str(text);
        }
    }

    fn handle_close(&mut self) {
        let depth = self.depth;

        let (finished, pending): (Vec<Capture>, Vec<Capture>) = std::mem::take(&mut self.captures)
            .into_iter()
            .partition(|c| c.depth == depth);
        self.captures = pending;
        for capture in finished {
            self.apply_capture(capture);
        }

        for builder in &mut self.open {
            builder.bib_data.close(depth);
            builder.case_num.close(depth);
            for block in builder.blocks.iter_mut().filter(|b| b.depth == depth) {
                block.open = false;
            }
        }

        if self.open.last().is_some_and(|b| b.depth == depth) {
            if let Some(builder) = self.open.pop() {
                let slot = builder.slot;
                self.slots[slot] = Some(builder.build());
            }
        }

        self.depth = self.depth.saturating_sub(1);
    }

    fn apply_capture(&mut self, capture: Capture) {
        let Some(builder) = self.open.get_mut(capture.decision) else {
            return;
        };
        let text = capture.text.trim();

        match capture.field {
            Field::Paragraph(block) => {
                if !text.is_empty() {
                    builder.blocks[block].paragraphs.push(text.to_string());
                }
            }
            Field::DistributionCode => builder.record.distribution_code = non_empty(text),
            Field::Country => builder.record.country = non_empty(text),
            Field::AppealNumber => builder.record.appeal_number = non_empty(text),
            Field::Year => builder.record.year = non_empty(text),
        }
    }

    fn finish(self, position: u64) -> Result<Vec<DecisionRecord>> {
        if !self.seen_root {
            return Err(xml_error(position, "document has no root element"));
        }
        if self.depth != 0 {
            return Err(xml_error(
                position,
                format!("unexpected end of document with {} unclosed element(s)", self.depth),
            ));
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn attribute(e: &BytesStart, name: &str, position: u64) -> Result<Option<String>> {
    let Some(attr) = e
        .try_get_attribute(name)
        .map_err(|err| xml_error(position, err))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|err| xml_error(position, err))?;
    Ok(Some(value.into_owned()))
}
