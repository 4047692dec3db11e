//! Text buffers addressed by line and column
//!
//! [`TextBuffer`] is the seam between the edit pipeline and whatever holds the document text.
//! [`Buffer`] is the in-memory implementation used for the scratch copy, the CLI and tests.

use crate::edit::{
    ChangeRecord, Edit, EditError, InvalidRangeSnafu, OverlappingEditsSnafu,
    PositionOutOfBoundsSnafu,
};
use blocks_ast::Position;
use snafu::ensure;
use tracing::trace;

/// Anything the edit pipeline can read, overwrite and apply edit batches to
pub trait TextBuffer {
    fn text(&self) -> &str;

    fn set_text(&mut self, text: &str);

    /// Apply a batch of edits, all expressed against the current text
    ///
    /// Either every edit is applied or none is. Edits are applied from the end of the
    /// document towards the start, so the positions of edits still pending never move. The
    /// returned records are in application order.
    fn apply(&mut self, edits: &[Edit]) -> Result<Vec<ChangeRecord>, EditError>;
}

/// A plain in-memory text buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    text: String,
}

impl Buffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn line_count(&self) -> u32 {
        self.text.split('\n').count() as u32
    }

    /// Position just past the last character
    pub fn end(&self) -> Position {
        let (line, last) = match self.text.rsplit_once('\n') {
            Some((_, last)) => (self.line_count() - 1, last),
            None => (0, self.text.as_str()),
        };
        Position::new(line, last.chars().count() as u32)
    }

    /// Byte offset of `pos`
    pub fn offset(&self, pos: Position) -> Result<usize, EditError> {
        let out_of_bounds = || EditError::PositionOutOfBounds {
            position: pos,
            last_line: self.line_count() - 1,
        };

        let mut line_start = 0;
        for (index, line) in self.text.split('\n').enumerate() {
            if index as u32 == pos.line {
                let column = pos.column as usize;
                return match line.char_indices().nth(column) {
                    Some((byte, _)) => Ok(line_start + byte),
                    None if line.chars().count() == column => Ok(line_start + line.len()),
                    None => Err(out_of_bounds()),
                };
            }
            line_start += line.len() + 1;
        }
        Err(out_of_bounds())
    }

    /// Text between two positions
    pub fn slice(&self, from: Position, to: Position) -> Result<&str, EditError> {
        ensure!(from <= to, InvalidRangeSnafu { from, to });
        let start = self.offset(from)?;
        let end = self.offset(to)?;
        Ok(&self.text[start..end])
    }

    /// Check a batch and return the order to apply it in
    fn plan(&self, edits: &[Edit]) -> Result<Vec<(usize, usize, usize)>, EditError> {
        let mut planned = Vec::with_capacity(edits.len());
        for (index, edit) in edits.iter().enumerate() {
            ensure!(
                edit.from <= edit.to,
                InvalidRangeSnafu {
                    from: edit.from,
                    to: edit.to
                }
            );
            planned.push((index, self.offset(edit.from)?, self.offset(edit.to)?));
        }

        // An insertion sorts before a range starting at the same offset
        planned.sort_by_key(|&(index, start, end)| (start, end, index));
        for pair in planned.windows(2) {
            let (a, b) = (&edits[pair[0].0], &edits[pair[1].0]);
            ensure!(
                a.to <= b.from,
                OverlappingEditsSnafu {
                    first: a.from,
                    second: b.from
                }
            );
        }

        planned.reverse();
        Ok(planned)
    }
}

impl TextBuffer for Buffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    fn apply(&mut self, edits: &[Edit]) -> Result<Vec<ChangeRecord>, EditError> {
        let planned = self.plan(edits)?;

        let mut records = Vec::with_capacity(planned.len());
        for (index, start, end) in planned {
            let edit = &edits[index];
            let removed = self.text[start..end].to_string();
            self.text.replace_range(start..end, &edit.text);
            trace!(from = %edit.from, to = %edit.to, text = %edit.text, "applied edit");
            records.push(ChangeRecord {
                from: edit.from,
                to: edit.to,
                text: edit.text.clone(),
                removed,
            });
        }
        Ok(records)
    }
}

impl From<&str> for Buffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, column: u32) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn offsets_count_characters() {
        let buffer = Buffer::new("(λ x)\n(+ 1 2)");
        assert_eq!(buffer.offset(pos(0, 0)), Ok(0));
        assert_eq!(buffer.offset(pos(0, 2)), Ok(3));
        assert_eq!(buffer.offset(pos(0, 5)), Ok(6));
        assert_eq!(buffer.offset(pos(1, 0)), Ok(7));
        assert_eq!(buffer.offset(pos(1, 7)), Ok(14));
        assert!(matches!(
            buffer.offset(pos(1, 8)),
            Err(EditError::PositionOutOfBounds { .. })
        ));
        assert!(buffer.offset(pos(2, 0)).is_err());
        assert_eq!(buffer.end(), pos(1, 7));
        assert_eq!(Buffer::default().end(), pos(0, 0));
    }

    #[test]
    fn replace_single_literal() {
        let mut buffer = Buffer::new("(+ 1 2)");
        let records = buffer
            .apply(&[Edit::new(pos(0, 3), pos(0, 4), "10")])
            .expect("valid edit");
        assert_eq!(buffer.text(), "(+ 10 2)");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].removed, "1");
        assert!(records[0].is_insertion());
    }

    #[test]
    fn batch_applies_end_to_start() {
        let mut buffer = Buffer::new("(f a b)");
        let records = buffer
            .apply(&[
                Edit::new(pos(0, 3), pos(0, 4), "first"),
                Edit::new(pos(0, 5), pos(0, 6), "second"),
            ])
            .expect("valid edits");
        assert_eq!(buffer.text(), "(f first second)");
        assert_eq!(records[0].text, "second");
        assert_eq!(records[1].text, "first");
    }

    #[test]
    fn inserts_at_same_point_keep_submission_order() {
        let mut buffer = Buffer::new("()");
        buffer
            .apply(&[Edit::insert(pos(0, 1), "a"), Edit::insert(pos(0, 1), "b")])
            .expect("valid edits");
        assert_eq!(buffer.text(), "(ab)");
    }

    #[test]
    fn invalid_batch_leaves_text_alone() {
        let mut buffer = Buffer::new("(+ 1 2)");

        let reversed = buffer.apply(&[Edit::new(pos(0, 4), pos(0, 2), "")]);
        assert!(matches!(reversed, Err(EditError::InvalidRange { .. })));

        let overlapping = buffer.apply(&[
            Edit::delete(pos(0, 1), pos(0, 4)),
            Edit::insert(pos(0, 2), "x"),
        ]);
        assert!(matches!(overlapping, Err(EditError::OverlappingEdits { .. })));

        let out_of_bounds = buffer.apply(&[
            Edit::insert(pos(0, 1), "ok"),
            Edit::insert(pos(4, 0), "nope"),
        ]);
        assert!(matches!(
            out_of_bounds,
            Err(EditError::PositionOutOfBounds { .. })
        ));

        assert_eq!(buffer.text(), "(+ 1 2)");
    }

    #[test]
    fn insertion_at_start_of_deletion_in_either_order() {
        let edits = [
            Edit::insert(pos(0, 1), "x"),
            Edit::delete(pos(0, 1), pos(0, 3)),
        ];
        let reversed = [edits[1].clone(), edits[0].clone()];

        for batch in [&edits, &reversed] {
            let mut buffer = Buffer::new("(abc)");
            buffer.apply(batch).expect("edits touch but do not overlap");
            assert_eq!(buffer.text(), "(xc)");
        }
    }

    #[test]
    fn multi_line_delete() {
        let mut buffer = Buffer::new("(a)\n(b)\n(c)");
        assert_eq!(buffer.slice(pos(0, 3), pos(2, 0)), Ok("\n(b)\n"));
        buffer
            .apply(&[Edit::delete(pos(1, 0), pos(2, 0))])
            .expect("valid edit");
        assert_eq!(buffer.text(), "(a)\n(c)");
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn set_text_replaces_everything() {
        let mut buffer = Buffer::from("old");
        buffer.set_text("new\ntext");
        assert_eq!(buffer.text(), "new\ntext");
        assert_eq!(buffer.end(), pos(1, 4));
    }
}
