/// Splits on `separator` except where it directly follows a backslash.
/// `\<separator>` is unescaped in the returned pieces; empty pieces are kept.
pub fn split_unescaped(input: &str, separator: char) -> Vec<String> {
    let escaped = format!("\\{separator}");
    let literal = separator.to_string();

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut prev = None;
    for c in input.chars() {
        if c == separator && prev != Some('\\') {
            pieces.push(current.replace(&escaped, &literal));
            current.clear();
        } else {
            current.push(c);
        }
        prev = Some(c);
    }
    pieces.push(current.replace(&escaped, &literal));
    pieces
}
