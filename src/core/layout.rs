//! Grid layout: maps a shuffled card onto the 5×5 grid and computes every
//! text line's position.
//!
//! Coordinates are points relative to the top-left corner of the printable
//! area, y growing downwards. The printable height is split into
//! [`PAGE_BANDS`] equal bands: band 0 holds the title, band 1 the card
//! number, bands 2..=6 the grid rows.
//!
//! Cells are filled column by column (outer loop column, inner loop row).
//! The centre cell is free and does not consume an entry.

use crate::domain::model::{
    Banner, BingoCard, CardLayout, CellContent, FontStyle, GridCell, LayoutSettings,
    LineSegment, PlacedLine, Rect, WordEntry, ENTRIES_PER_CARD, FREE_CELL, GRID_SIZE,
};
use crate::utils::error::{BingoError, Result};

/// Horizontal bands the printable height is divided into.
pub const PAGE_BANDS: usize = 8;

/// Band index of the first grid row.
pub const GRID_FIRST_BAND: usize = 2;

/// Blank line-heights between the song block and the artist block.
pub const SONG_ARTIST_GAP_LINES: usize = 2;

/// Literal two-character sequence (`\` `n`) marking a line break in the word list.
pub const LINE_BREAK_MARKER: &str = "\\n";

/// Splits text on [`LINE_BREAK_MARKER`], dropping empty pieces.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(LINE_BREAK_MARKER)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Vertical offsets (positive = up from the cell midline) for a song block of
/// `song_lines` lines followed by an artist block of `artist_lines` lines.
///
/// With `N = song_lines + artist_lines` and line height `H`:
///
/// - song line `i`: `H * ((N - 1) / 2 - i)`
/// - artist line `k`: `H * ((N - 1) / 2 - (k + song_lines + SONG_ARTIST_GAP_LINES))`
pub fn stack_offsets(
    song_lines: usize,
    artist_lines: usize,
    line_height: f32,
) -> (Vec<f32>, Vec<f32>) {
    let center = ((song_lines + artist_lines) as f32 - 1.0) / 2.0;

    let song = (0..song_lines)
        .map(|i| line_height * (center - i as f32))
        .collect();
    let artist = (0..artist_lines)
        .map(|k| line_height * (center - (k + song_lines + SONG_ARTIST_GAP_LINES) as f32))
        .collect();

    (song, artist)
}

pub struct GridLayoutEngine {
    settings: LayoutSettings,
}

impl GridLayoutEngine {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn column_width(&self) -> f32 {
        self.settings.page.printable_width() / GRID_SIZE as f32
    }

    pub fn band_height(&self) -> f32 {
        self.settings.page.printable_height() / PAGE_BANDS as f32
    }

    /// Distance between stacked lines inside a cell.
    pub fn entry_line_height(&self) -> f32 {
        self.settings.entry_font_size * self.settings.line_height
    }

    pub fn cell_bounds(&self, column: usize, row: usize) -> Rect {
        Rect {
            x: self.column_width() * column as f32,
            y: self.band_height() * (GRID_FIRST_BAND + row) as f32,
            width: self.column_width(),
            height: self.band_height(),
        }
    }

    fn band_bounds(&self, band: usize) -> Rect {
        Rect {
            x: 0.0,
            y: self.band_height() * band as f32,
            width: self.settings.page.printable_width(),
            height: self.band_height(),
        }
    }

    fn banner(&self, band: usize, text: String) -> Banner {
        Banner {
            bounds: self.band_bounds(band),
            line: PlacedLine {
                text,
                style: FontStyle::Bold,
                font_size: self.settings.title_font_size,
                offset: 0.0,
            },
        }
    }

    /// Lays out one card. Needs at least [`ENTRIES_PER_CARD`] entries; extra
    /// entries are left unused.
    pub fn layout(&self, card: &BingoCard) -> Result<CardLayout> {
        if card.entries.len() < ENTRIES_PER_CARD {
            return Err(BingoError::InsufficientEntries {
                available: card.entries.len(),
                required: ENTRIES_PER_CARD,
            });
        }

        let mut cursor = 0;
        let mut cells = Vec::with_capacity(GRID_SIZE * GRID_SIZE);

        for column in 0..GRID_SIZE {
            for row in 0..GRID_SIZE {
                let bounds = self.cell_bounds(column, row);

                if (column, row) == FREE_CELL {
                    cells.push(self.free_cell(column, row, bounds));
                    continue;
                }

                let entry = &card.entries[cursor];
                cursor += 1;
                cells.push(self.entry_cell(column, row, bounds, entry));
            }
        }

        tracing::debug!(
            "Card #{} laid out with {} entries",
            card.number,
            cursor
        );

        Ok(CardLayout {
            card_number: card.number,
            title: self.banner(0, card.title.clone()),
            number: self.banner(1, format!("#{}", card.number)),
            cells,
            grid_lines: self.grid_lines(),
        })
    }

    fn free_cell(&self, column: usize, row: usize, bounds: Rect) -> GridCell {
        GridCell {
            column,
            row,
            content: CellContent::Free,
            bounds,
            lines: vec![PlacedLine {
                text: self.settings.free_word.clone(),
                style: FontStyle::Bold,
                font_size: self.settings.title_font_size,
                offset: 0.0,
            }],
        }
    }

    fn entry_cell(&self, column: usize, row: usize, bounds: Rect, entry: &WordEntry) -> GridCell {
        let song_parts = split_lines(&entry.song);
        let artist_parts = split_lines(&entry.artist);
        let (song_offsets, artist_offsets) =
            stack_offsets(song_parts.len(), artist_parts.len(), self.entry_line_height());

        let size = self.settings.entry_font_size;
        let song_lines = song_parts
            .iter()
            .zip(song_offsets)
            .map(|(text, offset)| PlacedLine {
                text: text.to_string(),
                style: FontStyle::Italic,
                font_size: size,
                offset,
            });
        let artist_lines = artist_parts
            .iter()
            .zip(artist_offsets)
            .map(|(text, offset)| PlacedLine {
                text: text.to_string(),
                style: FontStyle::Regular,
                font_size: size,
                offset,
            });

        GridCell {
            column,
            row,
            content: CellContent::Entry {
                artist: entry.artist.clone(),
                song: entry.song.clone(),
            },
            bounds,
            lines: song_lines.chain(artist_lines).collect(),
        }
    }

    /// Outer border plus internal lines: 6 vertical, 6 horizontal.
    fn grid_lines(&self) -> Vec<LineSegment> {
        let width = self.settings.page.printable_width();
        let column_width = self.column_width();
        let band_height = self.band_height();
        let top = band_height * GRID_FIRST_BAND as f32;
        let bottom = band_height * (GRID_FIRST_BAND + GRID_SIZE) as f32;

        let vertical = (0..=GRID_SIZE).map(|i| LineSegment {
            x1: column_width * i as f32,
            y1: top,
            x2: column_width * i as f32,
            y2: bottom,
        });
        let horizontal = (0..=GRID_SIZE).map(|i| LineSegment {
            x1: 0.0,
            y1: band_height * (GRID_FIRST_BAND + i) as f32,
            x2: width,
            y2: band_height * (GRID_FIRST_BAND + i) as f32,
        });

        vertical.chain(horizontal).collect()
    }
}

impl Default for GridLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}
