use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Resume data (wire format shared with the browser editor, camelCase)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub name: String,
    pub photo: String,
    pub degree: String,
    pub gender: String,
    pub dob: String,
    pub email: String,
    pub contact: String,
    pub logo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub id: String,
    pub year: String,
    pub degree: String,
    pub institution: String,
    pub grade: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Internship {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: String,
    pub category: String,
    pub skills: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_details: PersonalDetails,
    pub education: Vec<Education>,
    pub internships: Vec<Internship>,
    pub achievements: Vec<Achievement>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub positions: Vec<Position>,
    pub activities: Vec<Activity>,
}

/// The repeatable sections of a resume, as they appear in request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Education,
    Internships,
    Achievements,
    Projects,
    Skills,
    Positions,
    Activities,
}

impl SectionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Education => "education",
            SectionKey::Internships => "internships",
            SectionKey::Achievements => "achievements",
            SectionKey::Projects => "projects",
            SectionKey::Skills => "skills",
            SectionKey::Positions => "positions",
            SectionKey::Activities => "activities",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    #[error("No entry '{id}' in {section}")]
    EntryNotFound { section: &'static str, id: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Field-level editing
// ────────────────────────────────────────────────────────────────────────────

/// A single row of a repeatable section.
pub trait Entry {
    fn blank(id: String) -> Self
    where
        Self: Sized;
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// Mutable access to a text field by its wire name.
    fn field_mut(&mut self, field: &str) -> Option<&mut String>;
}

macro_rules! impl_entry {
    ($ty:ident { $($field:ident),+ }) => {
        impl Entry for $ty {
            fn blank(id: String) -> Self {
                Self { id, ..Self::default() }
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn field_mut(&mut self, field: &str) -> Option<&mut String> {
                match field {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

impl_entry!(Education { year, degree, institution, grade });
impl_entry!(Internship { title, date, description });
impl_entry!(Project { name, date, description });
impl_entry!(Achievement { description });
impl_entry!(Skill { category, skills });
impl_entry!(Position { title, date, description });
impl_entry!(Activity { title, description });

/// Object-safe view over one section's entries.
trait EntryList {
    fn push_blank(&mut self, id: String);
    fn position(&self, id: &str) -> Option<usize>;
    fn field_mut(&mut self, index: usize, field: &str) -> Option<&mut String>;
    fn remove_at(&mut self, index: usize);
    fn ensure_ids(&mut self);
}

impl<T: Entry> EntryList for Vec<T> {
    fn push_blank(&mut self, id: String) {
        self.push(T::blank(id));
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.iter().position(|e| e.id() == id)
    }

    fn field_mut(&mut self, index: usize, field: &str) -> Option<&mut String> {
        self.get_mut(index).and_then(|e| e.field_mut(field))
    }

    fn remove_at(&mut self, index: usize) {
        self.remove(index);
    }

    fn ensure_ids(&mut self) {
        for entry in self.iter_mut() {
            if entry.id().trim().is_empty() {
                entry.set_id(new_entry_id());
            }
        }
    }
}

fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

impl PersonalDetails {
    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "name" => Some(&mut self.name),
            "photo" => Some(&mut self.photo),
            "degree" => Some(&mut self.degree),
            "gender" => Some(&mut self.gender),
            "dob" => Some(&mut self.dob),
            "email" => Some(&mut self.email),
            "contact" => Some(&mut self.contact),
            "logo" => Some(&mut self.logo),
            _ => None,
        }
    }
}

impl ResumeData {
    fn section_mut(&mut self, section: SectionKey) -> &mut dyn EntryList {
        match section {
            SectionKey::Education => &mut self.education,
            SectionKey::Internships => &mut self.internships,
            SectionKey::Achievements => &mut self.achievements,
            SectionKey::Projects => &mut self.projects,
            SectionKey::Skills => &mut self.skills,
            SectionKey::Positions => &mut self.positions,
            SectionKey::Activities => &mut self.activities,
        }
    }

    pub fn set_personal_field(&mut self, field: &str, value: String) -> Result<(), EditError> {
        let slot = self
            .personal_details
            .field_mut(field)
            .ok_or_else(|| EditError::UnknownField {
                field: field.to_string(),
            })?;
        *slot = value;
        Ok(())
    }

    /// Appends a blank entry and returns its freshly generated id.
    pub fn add_entry(&mut self, section: SectionKey) -> String {
        let id = new_entry_id();
        self.section_mut(section).push_blank(id.clone());
        id
    }

    pub fn update_entry_field(
        &mut self,
        section: SectionKey,
        id: &str,
        field: &str,
        value: String,
    ) -> Result<(), EditError> {
        let list = self.section_mut(section);
        let index = list.position(id).ok_or_else(|| EditError::EntryNotFound {
            section: section.as_str(),
            id: id.to_string(),
        })?;
        let slot = list
            .field_mut(index, field)
            .ok_or_else(|| EditError::UnknownField {
                field: field.to_string(),
            })?;
        *slot = value;
        Ok(())
    }

    pub fn remove_entry(&mut self, section: SectionKey, id: &str) -> Result<(), EditError> {
        let list = self.section_mut(section);
        let index = list.position(id).ok_or_else(|| EditError::EntryNotFound {
            section: section.as_str(),
            id: id.to_string(),
        })?;
        list.remove_at(index);
        Ok(())
    }

    /// Current description of an entry, for sections that have one.
    pub fn entry_description(&mut self, section: SectionKey, id: &str) -> Result<String, EditError> {
        let list = self.section_mut(section);
        let index = list.position(id).ok_or_else(|| EditError::EntryNotFound {
            section: section.as_str(),
            id: id.to_string(),
        })?;
        list.field_mut(index, "description")
            .map(|d| d.clone())
            .ok_or_else(|| EditError::UnknownField {
                field: "description".to_string(),
            })
    }

    pub fn set_entry_description(
        &mut self,
        section: SectionKey,
        id: &str,
        description: String,
    ) -> Result<(), EditError> {
        self.update_entry_field(section, id, "description", description)
    }

    /// Gives every entry without an id a fresh one (e.g. after AI extraction).
    pub fn ensure_entry_ids(&mut self) {
        for section in [
            SectionKey::Education,
            SectionKey::Internships,
            SectionKey::Achievements,
            SectionKey::Projects,
            SectionKey::Skills,
            SectionKey::Positions,
            SectionKey::Activities,
        ] {
            self.section_mut(section).ensure_ids();
        }
    }
}
