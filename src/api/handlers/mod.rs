mod images;
mod items;
mod system;

pub use images::serve_image;
pub use items::{create_item, get_item, list_items, search_items};
pub use system::{health, root};
