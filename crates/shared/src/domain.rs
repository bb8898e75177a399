use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ItemId);

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

pub const MAX_TEXT_CHARS: usize = 250;
pub const MAX_LIST_NAME_CHARS: usize = 100;
pub const MAX_DATE_CHARS: usize = 20;

/// Text given to the synthetic item that brings a new list into existence.
pub const PLACEHOLDER_ITEM_TEXT: &str = "Add a new item and then delete this.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    ToDo,
    Doing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::ToDo, Condition::Doing, Condition::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::ToDo => "to_do",
            Condition::Doing => "doing",
            Condition::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::ToDo => "To do",
            Condition::Doing => "Doing",
            Condition::Done => "Done",
        }
    }

    /// One step along `to_do -> doing -> done`. `None` at either end of the line.
    pub fn step(self, direction: Direction) -> Option<Condition> {
        match (self, direction) {
            (Condition::ToDo, Direction::Up) => Some(Condition::Doing),
            (Condition::Doing, Direction::Up) => Some(Condition::Done),
            (Condition::Doing, Direction::Down) => Some(Condition::ToDo),
            (Condition::Done, Direction::Down) => Some(Condition::Doing),
            (Condition::ToDo, Direction::Down) | (Condition::Done, Direction::Up) => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown condition '{}'", self.0)
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "to_do" => Ok(Condition::ToDo),
            "doing" => Ok(Condition::Doing),
            "done" => Ok(Condition::Done),
            other => Err(UnknownCondition(other.to_string())),
        }
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction '{}'", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// Storage key of a list.
///
/// Lists have no row of their own: a list exists while at least one item
/// carries its key. User input has spaces replaced by `_`, and display
/// reverses that, so a name typed with a literal `_` shows up with a space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListName(String);

impl ListName {
    pub const PLACEHOLDER: char = '_';

    pub fn from_input(raw: &str) -> Self {
        Self(raw.replace(' ', "_"))
    }

    /// Wraps a key exactly as it was stored.
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_key(&self) -> &str {
        &self.0
    }

    pub fn display(&self) -> String {
        self.0.replace(Self::PLACEHOLDER, " ")
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim_matches(|c: char| c == Self::PLACEHOLDER || c.is_whitespace()).is_empty()
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub list_name: ListName,
    pub date: Option<String>,
    pub time: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub text: String,
    pub list_name: ListName,
    pub date: Option<String>,
    pub condition: Condition,
}

impl NewItem {
    pub fn placeholder(list_name: ListName) -> Self {
        Self {
            text: PLACEHOLDER_ITEM_TEXT.to_string(),
            list_name,
            date: None,
            condition: Condition::ToDo,
        }
    }
}

/// Display names of the distinct lists, in the order given.
pub fn visible_lists(names: &[ListName]) -> Vec<String> {
    names.iter().map(ListName::display).collect()
}
