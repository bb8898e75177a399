//! Form and query payloads shared by the HTTP server and the admin tool.
//!
//! Every field is optional at this layer so that a malformed submission can
//! still be answered with a redirect or a validation error instead of an
//! extractor rejection.

use serde::{Deserialize, Serialize};

use crate::domain::{Item, ListName};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ViewQuery {
    pub list_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MoveForm {
    pub item_id: Option<String>,
    pub condition: Option<String>,
    pub way: Option<String>,
    pub list_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeleteItemForm {
    pub item_id: Option<String>,
    pub list_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AddItemForm {
    pub list_name: Option<String>,
    pub text: Option<String>,
    pub date: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListForm {
    pub list_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    pub lists: Vec<ListSummary>,
    pub current_list: Option<ListSummary>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSummary {
    pub key: ListName,
    pub display_name: String,
}

impl From<&ListName> for ListSummary {
    fn from(value: &ListName) -> Self {
        Self {
            key: value.clone(),
            display_name: value.display(),
        }
    }
}
