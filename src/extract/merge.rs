pub fn merge_multiline_value(text: &str) -> String {
    let mut items = Vec::<String>::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match items.last_mut() {
            Some(current) if current.ends_with('-') => {
                current.pop();
                current.push_str(line);
            }
            Some(current) if !starts_new_item(current.as_str(), line) => {
                if !current.ends_with(' ') {
                    current.push(' ');
                }
                current.push_str(line);
            }
            _ => items.push(line.to_string()),
        }
    }

    items.join("; ")
}

fn starts_new_item(current: &str, line: &str) -> bool {
    let closed = current.ends_with(['.', ';', ':', ',']);
    let uppercase = line
        .chars()
        .next()
        .map(char::is_uppercase)
        .unwrap_or(false);
    !current.is_empty() && !closed && uppercase
}
