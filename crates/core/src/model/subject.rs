use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every subject in the curriculum has the same number of lessons.
pub const LESSONS_PER_SUBJECT: u8 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubjectError {
    #[error("unknown subject: {0}")]
    Unknown(String),
}

//
// ─── SUBJECT ID ────────────────────────────────────────────────────────────────
//

/// The closed set of curriculum tracks.
///
/// Declaration order is catalog order, which is also the unlock chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectId {
    JavaScript,
    React,
    NodeJs,
    MongoDb,
    MySql,
    Java,
    Frontend,
}

impl SubjectId {
    /// All subjects in catalog order.
    pub const ALL: [SubjectId; 7] = [
        SubjectId::JavaScript,
        SubjectId::React,
        SubjectId::NodeJs,
        SubjectId::MongoDb,
        SubjectId::MySql,
        SubjectId::Java,
        SubjectId::Frontend,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this subject in the catalog.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            SubjectId::JavaScript => 0,
            SubjectId::React => 1,
            SubjectId::NodeJs => 2,
            SubjectId::MongoDb => 3,
            SubjectId::MySql => 4,
            SubjectId::Java => 5,
            SubjectId::Frontend => 6,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubjectId::JavaScript => "javascript",
            SubjectId::React => "react",
            SubjectId::NodeJs => "nodejs",
            SubjectId::MongoDb => "mongodb",
            SubjectId::MySql => "mysql",
            SubjectId::Java => "java",
            SubjectId::Frontend => "frontend",
        }
    }

    /// Static catalog entry for this subject.
    #[must_use]
    pub fn subject(self) -> &'static Subject {
        &SUBJECTS[self.index()]
    }

    /// The subject that must be completed before this one opens.
    #[must_use]
    pub fn previous(self) -> Option<SubjectId> {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// The subject this one unlocks once completed.
    #[must_use]
    pub fn next(self) -> Option<SubjectId> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectId {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| SubjectError::Unknown(needle.to_owned()))
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Static description of a curriculum track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub name: &'static str,
    pub code: &'static str,
    pub description: &'static str,
    pub total_lessons: u8,
}

pub const SUBJECTS: [Subject; 7] = [
    Subject {
        id: SubjectId::JavaScript,
        name: "JavaScript Fundamentals",
        code: "JS",
        description: "Learn the building blocks of web development",
        total_lessons: LESSONS_PER_SUBJECT,
    },
    Subject {
        id: SubjectId::React,
        name: "React Development",
        code: "RC",
        description: "Build interactive user interfaces",
        total_lessons: LESSONS_PER_SUBJECT,
    },
    Subject {
        id: SubjectId::NodeJs,
        name: "Node.js Backend",
        code: "ND",
        description: "Server-side JavaScript development",
        total_lessons: LESSONS_PER_SUBJECT,
    },
    Subject {
        id: SubjectId::MongoDb,
        name: "MongoDB Database",
        code: "DB",
        description: "NoSQL database management",
        total_lessons: LESSONS_PER_SUBJECT,
    },
    Subject {
        id: SubjectId::MySql,
        name: "MySQL Database",
        code: "SQL",
        description: "Relational database systems",
        total_lessons: LESSONS_PER_SUBJECT,
    },
    Subject {
        id: SubjectId::Java,
        name: "Java Programming",
        code: "JV",
        description: "Object-oriented programming",
        total_lessons: LESSONS_PER_SUBJECT,
    },
    Subject {
        id: SubjectId::Frontend,
        name: "Frontend Integration",
        code: "FE",
        description: "Complete web application development",
        total_lessons: LESSONS_PER_SUBJECT,
    },
];

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_index() {
        for (i, id) in SubjectId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(SUBJECTS[i].id, *id);
        }
    }

    #[test]
    fn unlock_chain_neighbours() {
        assert_eq!(SubjectId::JavaScript.previous(), None);
        assert_eq!(SubjectId::React.previous(), Some(SubjectId::JavaScript));
        assert_eq!(SubjectId::Java.next(), Some(SubjectId::Frontend));
        assert_eq!(SubjectId::Frontend.next(), None);
    }

    #[test]
    fn parses_known_ids_and_rejects_unknown() {
        assert_eq!("nodejs".parse::<SubjectId>().unwrap(), SubjectId::NodeJs);
        assert_eq!(" mysql ".parse::<SubjectId>().unwrap(), SubjectId::MySql);
        let err = "rust".parse::<SubjectId>().unwrap_err();
        assert_eq!(err, SubjectError::Unknown("rust".into()));
    }

    #[test]
    fn serde_uses_catalog_ids() {
        for id in SubjectId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }
}
