use crate::constants::SESSION_ID_LENGTH;
use rand::Rng;

/// Lexically normalises a slash separated path.
///
/// Resolves `.` and `..` elements and collapses repeated separators. A rooted
/// path never climbs above `/`, so `/../../etc` becomes `/etc`. An empty
/// result becomes `/` for rooted input and `.` otherwise. Nothing here
/// touches the filesystem.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for element in path.split('/') {
        match element {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Right aligns `input` in a field of `length` characters, truncating when too long.
pub fn lpad(input: &str, length: usize) -> String {
    let width = input.chars().count();
    if width < length {
        format!("{}{}", " ".repeat(length - width), input)
    } else {
        input.chars().take(length).collect()
    }
}

/// Returns a random hex token used to correlate the log lines of one session.
pub fn new_session_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SESSION_ID_LENGTH)
        .map(|_| format!("{:x}", rng.gen_range(0..16u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_rooted() {
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("//files//two.txt"), "/files/two.txt");
        assert_eq!(clean_path("/files/./two.txt"), "/files/two.txt");
        assert_eq!(clean_path("/files/sub/../two.txt"), "/files/two.txt");
        assert_eq!(clean_path("/../../../../etc/passwd"), "/etc/passwd");
        assert_eq!(clean_path("/files/"), "/files");
    }

    #[test]
    fn test_clean_path_relative() {
        assert_eq!(clean_path(""), ".");
        assert_eq!(clean_path("a/.."), ".");
        assert_eq!(clean_path("../a"), "../a");
        assert_eq!(clean_path("a/b/../../.."), "..");
    }

    #[test]
    fn test_lpad() {
        assert_eq!(lpad("42", 5), "   42");
        assert_eq!(lpad("12345", 5), "12345");
        assert_eq!(lpad("123456", 5), "12345");
    }

    #[test]
    fn test_session_id() {
        let id = new_session_id();
        assert_eq!(id.len(), SESSION_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_session_id());
    }
}
