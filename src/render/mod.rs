pub mod html;

pub use html::{escape_html, render_page, render_table};
