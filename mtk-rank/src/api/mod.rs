//! HTTP API handlers for mtk-rank

pub mod albums;
pub mod health;
pub mod items;
pub mod lists;

pub use albums::{get_album, upsert_album};
pub use health::{client_config, health_routes};
pub use items::{move_item, remove_item, set_status};
pub use lists::{add_item, batch_reposition, get_list_view, get_or_create_list, randomize};
