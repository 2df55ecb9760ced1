const NOISE_PREFIXES: &[&str] = &[
    "Date Submitted:",
    "Submitted By:",
    "Envelope Construction Progress Inspection",
    "Exterior Inspections",
];

pub fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{0000}', "")
}

pub fn is_noise_line(line: &str) -> bool {
    let trimmed = line.trim();
    if NOISE_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return true;
    }

    trimmed
        .strip_prefix("Page ")
        .map(|rest| rest.starts_with(|character: char| character.is_ascii_digit()))
        .unwrap_or(false)
}

pub fn block_lines(block: &str, section_name: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| line.trim_end_matches(':') != section_name)
        .filter(|line| !is_noise_line(line))
        .map(ToOwned::to_owned)
        .collect()
}

pub fn first_content_line_index(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !is_noise_line(trimmed)
    })
}

pub fn cell_text(cell: Option<&Option<String>>) -> String {
    cell.and_then(|value| value.as_deref())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
