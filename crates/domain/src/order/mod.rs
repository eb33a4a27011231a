//! Order aggregate and the handling of its embedded line items.

mod aggregate;
mod codec;
mod line_item;
mod service;
mod total;

pub use aggregate::Order;
pub use codec::{EMPTY_LINE_ITEMS, code_needles, decode_line_items, encode_line_items};
pub use line_item::LineItem;
pub use service::OrderService;
pub use total::compute_total;
