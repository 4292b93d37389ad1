use chrono::Utc;
use clap::Subcommand;
use pastel_core::notes::tag_color;
use pastel_core::{Note, NoteDraft, TagColor};

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum NotesAction {
    /// List notes, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a note
    Add {
        title: String,
        content: String,
        #[arg(long, default_value = "")]
        tag: String,
    },
    /// Replace the fields of an existing note
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Delete a note
    Delete { id: i64 },
}

fn color_name(color: TagColor) -> &'static str {
    match color {
        TagColor::Muted => "muted",
        TagColor::Primary => "primary",
        TagColor::Secondary => "secondary",
        TagColor::Accent => "accent",
        TagColor::Pink => "pink",
        TagColor::Amber => "amber",
    }
}

pub fn run(action: NotesAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        NotesAction::List { json } => {
            let notes = session.app.notes().list();
            if json {
                print_json(notes)?;
            } else {
                for note in notes {
                    println!(
                        "{}  {}  {} ({})",
                        note.id,
                        note.title,
                        note.tag,
                        color_name(tag_color(&note.tag))
                    );
                    println!("    {}", note.content);
                }
            }
        }
        NotesAction::Add {
            title,
            content,
            tag,
        } => {
            let draft = NoteDraft {
                title: title.trim().to_string(),
                content: content.trim().to_string(),
                tag: tag.trim().to_string(),
            };
            draft.validate()?;
            let id = session.app.add_note(draft, Utc::now());
            println!("{id}");
        }
        NotesAction::Edit {
            id,
            title,
            content,
            tag,
        } => {
            let Some(current) = session.app.notes().get(id).cloned() else {
                return Err(format!("no note with id {id}").into());
            };
            let draft = NoteDraft {
                title: title.map_or(current.title, |t| t.trim().to_string()),
                content: content.map_or(current.content, |c| c.trim().to_string()),
                tag: tag.map_or(current.tag, |t| t.trim().to_string()),
            };
            draft.validate()?;
            session.app.update_note(Note {
                id,
                title: draft.title,
                content: draft.content,
                tag: draft.tag,
            });
            println!("ok");
        }
        NotesAction::Delete { id } => match session.app.delete_note(id) {
            Some(note) => println!("deleted '{}'", note.title),
            None => return Err(format!("no note with id {id}").into()),
        },
    }

    session.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_match_serialized_form() {
        for color in [TagColor::Muted, TagColor::Primary, TagColor::Amber] {
            let json = serde_json::to_value(color).unwrap();
            assert_eq!(json, color_name(color));
        }
    }
}
