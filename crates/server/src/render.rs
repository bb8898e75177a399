use server_api::Board;
use shared::domain::{Condition, Direction, Item, ListName};

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn list_href(list_name: &ListName) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("list_name", list_name.as_key())
        .finish();
    format!("/?{query}")
}

pub(crate) fn render_board(board: &Board) -> String {
    let mut body = String::new();
    body.push_str(&render_nav(board));

    match &board.current_list {
        Some(current) => body.push_str(&render_current_list(board, current)),
        None => body.push_str(
            "<section class=\"empty\"><h2>No lists yet</h2>\
             <p>Create a list to get started.</p></section>",
        ),
    }

    body.push_str(
        "<form method=\"post\" action=\"/add_list\" class=\"add-list\">\
         <input name=\"list_name\" placeholder=\"New list\" required>\
         <button type=\"submit\">Add list</button></form>",
    );

    let title = board
        .current_list
        .as_ref()
        .map(|list| escape_html(&list.display()))
        .unwrap_or_else(|| "To-do".to_string());
    format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title}</title></head><body>{body}</body></html>\n"
    )
}

fn render_nav(board: &Board) -> String {
    let mut nav = String::from("<nav><ul>");
    for list in &board.lists {
        let active = board
            .current_list
            .as_ref()
            .is_some_and(|current| current.display() == list.display());
        nav.push_str(&format!(
            "<li{}><a href=\"{}\">{}</a></li>",
            if active { " class=\"active\"" } else { "" },
            escape_html(&list_href(list)),
            escape_html(&list.display()),
        ));
    }
    nav.push_str("</ul></nav>");
    nav
}

fn render_current_list(board: &Board, current: &ListName) -> String {
    let key = escape_html(current.as_key());
    let mut html = format!("<main><h1>{}</h1>", escape_html(&current.display()));

    for condition in Condition::ALL {
        html.push_str(&format!(
            "<section class=\"column {}\"><h2>{}</h2><ul>",
            condition.as_str(),
            condition.label()
        ));
        for item in board.current_items_in(condition) {
            html.push_str(&render_item(item, &key));
        }
        html.push_str("</ul></section>");
    }

    html.push_str(&format!(
        "<form method=\"post\" action=\"/add_item\" class=\"add-item\">\
         <input type=\"hidden\" name=\"list_name\" value=\"{key}\">\
         <input name=\"text\" placeholder=\"New item\" maxlength=\"250\" required>\
         <input name=\"date\" placeholder=\"Date\" maxlength=\"20\">\
         <select name=\"condition\">{options}</select>\
         <button type=\"submit\">Add item</button></form>\
         <form method=\"post\" action=\"/delete_list\" class=\"delete-list\">\
         <input type=\"hidden\" name=\"list_name\" value=\"{key}\">\
         <button type=\"submit\">Delete list</button></form></main>",
        options = Condition::ALL
            .iter()
            .map(|c| format!("<option value=\"{}\">{}</option>", c.as_str(), c.label()))
            .collect::<String>(),
    ));
    html
}

fn render_item(item: &Item, list_key: &str) -> String {
    let mut buttons = String::new();
    for way in [Direction::Down, Direction::Up] {
        if item.condition.step(way).is_none() {
            continue;
        }
        buttons.push_str(&format!(
            "<form method=\"post\" action=\"/move\">\
             <input type=\"hidden\" name=\"item_id\" value=\"{id}\">\
             <input type=\"hidden\" name=\"condition\" value=\"{condition}\">\
             <input type=\"hidden\" name=\"way\" value=\"{way}\">\
             <input type=\"hidden\" name=\"list_name\" value=\"{list_key}\">\
             <button type=\"submit\">{arrow}</button></form>",
            id = item.id.0,
            condition = item.condition.as_str(),
            way = way.as_str(),
            arrow = match way {
                Direction::Up => "&rarr;",
                Direction::Down => "&larr;",
            },
        ));
    }
    let date = item
        .date
        .as_deref()
        .map(|d| format!(" <small>{}</small>", escape_html(d)))
        .unwrap_or_default();

    format!(
        "<li data-item-id=\"{id}\"><span>{text}</span>{date}{buttons}\
         <form method=\"post\" action=\"/delete_item\">\
         <input type=\"hidden\" name=\"item_id\" value=\"{id}\">\
         <input type=\"hidden\" name=\"list_name\" value=\"{list_key}\">\
         <button type=\"submit\">Delete</button></form></li>",
        id = item.id.0,
        text = escape_html(&item.text),
    )
}
