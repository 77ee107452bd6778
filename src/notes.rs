//! Listings of the characters in each class.

use crate::generators::CharacterClass;

pub fn render_text() -> String {
    let mut out = String::new();
    for class in CharacterClass::ALL {
        let chars: Vec<String> = class.table().chars().map(String::from).collect();
        out.push_str(&format!("{}: {}\n", class, chars.join(" ")));
    }
    out
}

pub fn render_html(class: CharacterClass) -> String {
    class
        .table()
        .chars()
        .map(|c| format!("<span class=\"char-item\">{}</span>", escape(c)))
        .collect()
}

pub fn render_html_all() -> String {
    CharacterClass::ALL
        .into_iter()
        .map(|class| {
            format!(
                "<section id=\"{}-note-section\">{}</section>\n",
                class,
                render_html(class)
            )
        })
        .collect()
}

fn escape(c: char) -> String {
    match c {
        '&' => String::from("&amp;"),
        '<' => String::from("&lt;"),
        '>' => String::from("&gt;"),
        '"' => String::from("&quot;"),
        '\'' => String::from("&#39;"),
        _ => c.to_string(),
    }
}
