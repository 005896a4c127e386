use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Ballot ids for files that do not carry one: the file name and the line number.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids() {
        assert_eq!(simplify_file_name("/tmp/data/ballots.csv"), "ballots.csv");
        let f = make_default_id("/tmp/data/ballots.csv");
        assert_eq!(f(12), "ballots.csv-00000012");
    }
}
