use crate::store::{Record, Schema};

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render records as a `<table>` with a header row from the schema
pub fn render_table(schema: &Schema, records: &[Record]) -> String {
    let header: String = schema
        .columns()
        .iter()
        .map(|column| format!("<th>{}</th>", escape_html(column)))
        .collect();

    let mut html = format!(
        "<table class=\"table table-striped\">\n  <thead>\n    <tr>{}</tr>\n  </thead>\n  <tbody>\n",
        header
    );
    for record in records {
        let cells: String = record
            .to_row(schema)
            .iter()
            .map(|value| format!("<td>{}</td>", escape_html(value)))
            .collect();
        html.push_str(&format!("    <tr>{}</tr>\n", cells));
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}

/// Render a complete standalone page holding the catalog table
pub fn render_page(schema: &Schema, records: &[Record], title: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css\">\n\
         </head>\n\
         <body>\n\
         <div class=\"container\">\n\
         <h2>{title}</h2>\n\
         {table}\
         </div>\n\
         </body>\n\
         </html>\n",
        title = title,
        table = render_table(schema, records),
    )
}
