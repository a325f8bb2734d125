/// Lines added and removed by a GitHub file patch, without their `+`/`-`
/// markers. GitHub patches carry hunks only, no `---`/`+++` file headers.
pub fn changed_lines(patch: &str) -> (Vec<String>, Vec<String>) {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    for line in patch.lines() {
        if let Some(text) = line.strip_prefix('+') {
            added.push(text.to_owned());
        } else if let Some(text) = line.strip_prefix('-') {
            removed.push(text.to_owned());
        }
    }
    (added, removed)
}
