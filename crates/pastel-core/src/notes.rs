//! Notes list and tag colours.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tag: String,
}

/// A note before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl NoteDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("title", &self.title), ("content", &self.content)] {
            if value.trim().is_empty() {
                return Err(ValidationError::TooShort {
                    field: field.into(),
                    min: 1,
                });
            }
        }
        Ok(())
    }
}

/// Newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesCollection {
    notes: Vec<Note>,
}

impl NotesCollection {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn seeded() -> Self {
        let samples = [
            (1, "Biology Revision", "Spaced repetition is key for remembering all the complex biological terms and processes. Review flashcards daily.", "#biology"),
            (2, "Meeting Prep", "Prepare slides for the project update meeting. Include progress charts and next steps.", "#meeting"),
            (3, "Shopping List", "Milk, bread, eggs, and of course, more pastel highlighters.", "#personal"),
            (4, "Physics Formulas", "E=mc^2, F=ma, and all the others for the upcoming exam.", "#physics"),
        ];
        Self::new(
            samples
                .into_iter()
                .map(|(id, title, content, tag)| Note {
                    id,
                    title: title.into(),
                    content: content.into(),
                    tag: tag.into(),
                })
                .collect(),
        )
    }

    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Prepend a note with an id taken from `now_ms`, bumped past any id
    /// already in use.
    pub fn add(&mut self, draft: NoteDraft, now_ms: i64) -> &Note {
        let id = match self.notes.iter().map(|n| n.id).max() {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        };
        self.notes.insert(
            0,
            Note {
                id,
                title: draft.title,
                content: draft.content,
                tag: draft.tag,
            },
        );
        &self.notes[0]
    }

    /// Replace the note with the same id. Returns `false` if there is none.
    pub fn update(&mut self, note: Note) -> bool {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => {
                *slot = note;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: i64) -> Option<Note> {
        let idx = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(idx))
    }
}

/// Fixed palette for tag badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Muted,
    Primary,
    Secondary,
    Accent,
    Pink,
    Amber,
}

const PALETTE: [TagColor; 5] = [
    TagColor::Primary,
    TagColor::Secondary,
    TagColor::Accent,
    TagColor::Pink,
    TagColor::Amber,
];

/// Deterministic colour for a tag: a 32-bit `hash * 31 + unit` rolling hash
/// over UTF-16 code units, folded onto the palette. Empty tags are muted.
pub fn tag_color(tag: &str) -> TagColor {
    if tag.is_empty() {
        return TagColor::Muted;
    }
    let hash = tag.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit)
            .wrapping_add(hash.wrapping_shl(5))
            .wrapping_sub(hash)
    });
    let idx = (hash % PALETTE.len() as i32).unsigned_abs() as usize;
    PALETTE[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NoteDraft {
        NoteDraft {
            title: title.into(),
            content: "body".into(),
            tag: "#misc".into(),
        }
    }

    #[test]
    fn add_prepends_with_clock_id() {
        let mut notes = NotesCollection::seeded();
        let id = notes.add(draft("New"), 1_700_000_000_000).id;
        assert_eq!(id, 1_700_000_000_000);
        assert_eq!(notes.list()[0].title, "New");
        assert_eq!(notes.len(), 5);
    }

    #[test]
    fn add_bumps_colliding_ids() {
        let mut notes = NotesCollection::default();
        let a = notes.add(draft("a"), 10).id;
        let b = notes.add(draft("b"), 10).id;
        assert_eq!((a, b), (10, 11));
    }

    #[test]
    fn update_replaces_by_id() {
        let mut notes = NotesCollection::seeded();
        let mut edited = notes.get(2).unwrap().clone();
        edited.title = "Meeting Prep v2".into();
        assert!(notes.update(edited));
        assert_eq!(notes.get(2).unwrap().title, "Meeting Prep v2");

        let ghost = Note { id: 99, title: "x".into(), content: "y".into(), tag: String::new() };
        assert!(!notes.update(ghost));
    }

    #[test]
    fn delete_removes_by_id() {
        let mut notes = NotesCollection::seeded();
        assert_eq!(notes.delete(3).unwrap().title, "Shopping List");
        assert!(notes.delete(3).is_none());
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn draft_requires_title_and_content() {
        assert!(draft("ok").validate().is_ok());
        assert!(draft("  ").validate().is_err());
        let mut d = draft("ok");
        d.content = String::new();
        assert!(d.validate().is_err());
    }

    #[test]
    fn tag_color_is_stable_and_in_palette() {
        assert_eq!(tag_color(""), TagColor::Muted);
        assert_eq!(tag_color("#biology"), tag_color("#biology"));
        for tag in ["#biology", "#meeting", "#personal", "#physics", "a", "日本"] {
            assert!(PALETTE.contains(&tag_color(tag)));
        }
    }

    #[test]
    fn tag_color_matches_rolling_hash() {
        // "a" hashes to 97; 97 % 5 == 2.
        assert_eq!(tag_color("a"), TagColor::Accent);
        // "ab": 97 * 31 + 98 = 3105; 3105 % 5 == 0.
        assert_eq!(tag_color("ab"), TagColor::Primary);
    }
}
