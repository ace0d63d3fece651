use serde::{Deserialize, Serialize};

/// Grid dimension (5×5).
pub const GRID_SIZE: usize = 5;

/// Column and row of the free cell.
pub const FREE_CELL: (usize, usize) = (2, 2);

/// Entries consumed by one card: every cell except the free one.
pub const ENTRIES_PER_CARD: usize = GRID_SIZE * GRID_SIZE - 1;

/// One (artist, song) pair parsed from a `SongTitle-ArtistName` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    pub artist: String,
    pub song: String,
}

impl WordEntry {
    pub fn new(artist: impl Into<String>, song: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            song: song.into(),
        }
    }
}

/// The deduplicated, parsed playlist. Built once per run and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<WordEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the catalog can fill every non-free cell of a card.
    pub fn can_fill_card(&self) -> bool {
        self.entries.len() >= ENTRIES_PER_CARD
    }
}

/// A card before layout: its own shuffled copy of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct BingoCard {
    pub number: u32,
    pub title: String,
    pub entries: Vec<WordEntry>,
}

/// Logical font variants. The renderer resolves them through a `FontResolver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    /// Suffix used in font file names, e.g. `OpenSans-BoldItalic`.
    pub fn variant_name(&self) -> &'static str {
        match self {
            FontStyle::Regular => "Regular",
            FontStyle::Bold => "Bold",
            FontStyle::Italic => "Italic",
            FontStyle::BoldItalic => "BoldItalic",
        }
    }
}

/// Axis-aligned rectangle in points. Origin is the top-left corner of the
/// printable area, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Straight line segment, same coordinate space as `Rect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// One line of text placed relative to the midline of its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub text: String,
    pub style: FontStyle,
    pub font_size: f32,
    /// Distance from the box's vertical midline, positive is upwards.
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellContent {
    Free,
    Entry { artist: String, song: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub column: usize,
    pub row: usize,
    pub content: CellContent,
    pub bounds: Rect,
    pub lines: Vec<PlacedLine>,
}

impl GridCell {
    pub fn is_free(&self) -> bool {
        matches!(self.content, CellContent::Free)
    }
}

/// Centered single-line text in a horizontal band (title, card number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub bounds: Rect,
    pub line: PlacedLine,
}

/// Fully computed page for one card. Everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    pub card_number: u32,
    pub title: Banner,
    pub number: Banner,
    /// Column-major: index = column * 5 + row.
    pub cells: Vec<GridCell>,
    pub grid_lines: Vec<LineSegment>,
}

impl CardLayout {
    pub fn cell(&self, column: usize, row: usize) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|cell| cell.column == column && cell.row == row)
    }

    /// Entries in the order they were consumed.
    pub fn entries(&self) -> Vec<WordEntry> {
        self.cells
            .iter()
            .filter_map(|cell| match &cell.content {
                CellContent::Entry { artist, song } => {
                    Some(WordEntry::new(artist.clone(), song.clone()))
                }
                CellContent::Free => None,
            })
            .collect()
    }
}

/// PDF bytes for one card, ready to be saved.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub card_number: u32,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardFailure {
    pub card_number: u32,
    pub message: String,
}

/// Outcome of a batch. Failed cards are listed, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub requested: u32,
    pub written: Vec<String>,
    pub failures: Vec<CardFailure>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Output file name for a card, keyed by card number.
pub fn card_file_name(card_number: u32) -> String {
    format!("bingo_{}.pdf", card_number)
}

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with 2 cm margins.
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 56.69,
    };

    pub fn from_mm(width_mm: f32, height_mm: f32, margin_mm: f32) -> Self {
        Self {
            width: mm_to_pt(width_mm),
            height: mm_to_pt(height_mm),
            margin: mm_to_pt(margin_mm),
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Everything the layout engine needs besides the entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub page: PageGeometry,
    pub entry_font_size: f32,
    pub title_font_size: f32,
    pub line_height: f32,
    pub border_thickness: f32,
    pub free_word: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page: PageGeometry::A4,
            entry_font_size: 8.0,
            title_font_size: 20.0,
            line_height: 1.0,
            border_thickness: 1.0,
            free_word: "FREE".to_string(),
        }
    }
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}
