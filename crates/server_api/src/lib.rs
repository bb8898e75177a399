use std::sync::Arc;

use rand::{seq::IndexedRandom, Rng};
use shared::{
    domain::{
        Condition, Direction, Item, ItemId, ListName, NewItem, MAX_DATE_CHARS,
        MAX_LIST_NAME_CHARS, MAX_TEXT_CHARS,
    },
    error::ApiError,
    protocol::{AddItemForm, BoardResponse, DeleteItemForm, ListForm, ListSummary, MoveForm},
};
use storage::ItemStore;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Arc<dyn ItemStore>,
}

impl ApiContext {
    pub fn new(storage: impl ItemStore + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }
}

/// Everything the list view needs for one render.
#[derive(Debug, Clone)]
pub struct Board {
    pub lists: Vec<ListName>,
    /// `None` only when no list exists and none was asked for.
    pub current_list: Option<ListName>,
    pub items: Vec<Item>,
}

impl Board {
    pub fn current_items(&self) -> impl Iterator<Item = &Item> {
        let current = self.current_list.as_ref();
        self.items
            .iter()
            .filter(move |item| current.is_some_and(|list| list.display() == item.list_name.display()))
    }

    pub fn current_items_in(&self, condition: Condition) -> impl Iterator<Item = &Item> {
        self.current_items()
            .filter(move |item| item.condition == condition)
    }

    pub fn visible_lists(&self) -> Vec<String> {
        shared::domain::visible_lists(&self.lists)
    }
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        let current_list = board.current_list.as_ref().map(ListSummary::from);
        let items = board.current_items().cloned().collect();
        Self {
            lists: board.lists.iter().map(ListSummary::from).collect(),
            current_list,
            items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: Condition, to: Condition },
    /// The item exists but the submitted condition/direction pair is not a move.
    Unchanged,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// The list to show: the requested one if any, otherwise a uniform pick.
pub fn pick_current_list<R: Rng + ?Sized>(
    lists: &[ListName],
    requested: Option<&str>,
    rng: &mut R,
) -> Option<ListName> {
    match requested.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => Some(ListName::from_input(raw)),
        None => lists.choose(rng).cloned(),
    }
}

pub async fn load_board(ctx: &ApiContext, requested: Option<&str>) -> Result<Board, ApiError> {
    let items = ctx.storage.list_items().await.map_err(internal)?;
    let lists = ctx.storage.distinct_list_names().await.map_err(internal)?;
    let current_list = pick_current_list(&lists, requested, &mut rand::rng());
    if current_list.is_none() {
        debug!("no lists exist yet");
    }
    Ok(Board {
        lists,
        current_list,
        items,
    })
}

pub async fn move_item(
    ctx: &ApiContext,
    item_id: ItemId,
    submitted: Option<Condition>,
    way: Option<Direction>,
) -> Result<MoveOutcome, ApiError> {
    if ctx.storage.find_item(item_id).await.map_err(internal)?.is_none() {
        debug!(item_id = item_id.0, "move ignored, item not found");
        return Ok(MoveOutcome::NotFound);
    }

    let Some((from, to)) = submitted.zip(way).and_then(|(from, way)| {
        from.step(way).map(|to| (from, to))
    }) else {
        debug!(item_id = item_id.0, ?submitted, ?way, "move ignored, no transition");
        return Ok(MoveOutcome::Unchanged);
    };

    if !ctx
        .storage
        .update_condition(item_id, to)
        .await
        .map_err(internal)?
    {
        return Ok(MoveOutcome::NotFound);
    }
    info!(item_id = item_id.0, %from, %to, "item moved");
    Ok(MoveOutcome::Moved { from, to })
}

/// Form entry point for `/move`. Unparseable fields degrade to no-ops.
pub async fn submit_move(ctx: &ApiContext, form: &MoveForm) -> Result<MoveOutcome, ApiError> {
    let Some(item_id) = parse_item_id(form.item_id.as_deref()) else {
        debug!(item_id = ?form.item_id, "move ignored, item id unusable");
        return Ok(MoveOutcome::NotFound);
    };
    let submitted: Option<Condition> = form.condition.as_deref().and_then(|c| c.parse().ok());
    let way: Option<Direction> = form.way.as_deref().and_then(|w| w.parse().ok());
    move_item(ctx, item_id, submitted, way).await
}

pub async fn delete_item(ctx: &ApiContext, item_id: ItemId) -> Result<DeleteOutcome, ApiError> {
    if ctx.storage.delete_item(item_id).await.map_err(internal)? {
        info!(item_id = item_id.0, "item deleted");
        Ok(DeleteOutcome::Deleted)
    } else {
        debug!(item_id = item_id.0, "delete ignored, item not found");
        Ok(DeleteOutcome::NotFound)
    }
}

pub async fn submit_delete_item(
    ctx: &ApiContext,
    form: &DeleteItemForm,
) -> Result<DeleteOutcome, ApiError> {
    match parse_item_id(form.item_id.as_deref()) {
        Some(item_id) => delete_item(ctx, item_id).await,
        None => {
            debug!(item_id = ?form.item_id, "delete ignored, item id unusable");
            Ok(DeleteOutcome::NotFound)
        }
    }
}

pub async fn add_item(ctx: &ApiContext, form: &AddItemForm) -> Result<Item, ApiError> {
    let list_name = required_list_name(form.list_name.as_deref())?;
    let text = required_field("text", form.text.as_deref(), MAX_TEXT_CHARS)?;
    let condition = required_field("condition", form.condition.as_deref(), usize::MAX)?
        .parse::<Condition>()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let date = match form.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) if date.chars().count() > MAX_DATE_CHARS => {
            return Err(ApiError::validation(format!(
                "date exceeds {MAX_DATE_CHARS} characters"
            )))
        }
        other => other.map(str::to_string),
    };

    let item = ctx
        .storage
        .create_item(NewItem {
            text,
            list_name,
            date,
            condition,
        })
        .await
        .map_err(internal)?;
    info!(item_id = item.id.0, list = item.list_name.as_key(), "item added");
    Ok(item)
}

/// Creates the placeholder item that makes a new list exist.
pub async fn add_list(ctx: &ApiContext, form: &ListForm) -> Result<Item, ApiError> {
    let list_name = required_list_name(form.list_name.as_deref())?;
    let item = ctx
        .storage
        .create_item(NewItem::placeholder(list_name))
        .await
        .map_err(internal)?;
    info!(list = item.list_name.as_key(), "list added");
    Ok(item)
}

pub async fn delete_list(ctx: &ApiContext, form: &ListForm) -> Result<u64, ApiError> {
    let list_name = required_list_name(form.list_name.as_deref())?;
    let removed = ctx
        .storage
        .delete_items_in_list(&list_name)
        .await
        .map_err(internal)?;
    info!(list = list_name.as_key(), removed, "list deleted");
    Ok(removed)
}

pub async fn health_check(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.storage.health_check().await.map_err(internal)
}

fn parse_item_id(raw: Option<&str>) -> Option<ItemId> {
    raw.and_then(|raw| raw.parse().ok())
}

fn required_field(name: &str, raw: Option<&str>, max_chars: usize) -> Result<String, ApiError> {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{name} is required")))?;
    if value.chars().count() > max_chars {
        return Err(ApiError::validation(format!(
            "{name} exceeds {max_chars} characters"
        )));
    }
    Ok(value.to_string())
}

fn required_list_name(raw: Option<&str>) -> Result<ListName, ApiError> {
    let raw = required_field("list_name", raw, MAX_LIST_NAME_CHARS)?;
    let list_name = ListName::from_input(&raw);
    if list_name.is_blank() {
        return Err(ApiError::validation("list_name is required"));
    }
    Ok(list_name)
}

fn internal(e: anyhow::Error) -> ApiError {
    ApiError::internal(format!("{e:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
