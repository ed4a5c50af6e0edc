use yr_core::{Element, ForecastDocument};

pub fn print(doc: &ForecastDocument, json: bool, depth: usize) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(doc)?);
    } else {
        print!("{}", outline(doc.root(), depth));
    }
    Ok(())
}

/// Indented outline of `root`, one element per line, down to `max_depth` levels.
pub fn outline(root: &Element, max_depth: usize) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0, max_depth);
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize, max_depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str(el.name());
    for attr in &el.attributes {
        out.push_str(&format!(" {}={:?}", attr.name, attr.value));
    }

    let text = el.text();
    if !text.is_empty() {
        out.push_str(": ");
        out.push_str(&text);
    }
    out.push('\n');

    if depth + 1 >= max_depth {
        let hidden = el.children().count();
        if hidden > 0 {
            out.push_str(&format!("{indent}  ... {hidden} more\n"));
        }
        return;
    }

    for child in el.children() {
        write_element(out, child, depth + 1, max_depth);
    }
}
