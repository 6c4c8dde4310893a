//! Segment-wise path handling
//!
//! Paths inside the tree are absolute strings using `/` as separator. Windows style
//! `\` separators are accepted on input. The first segment of an absolute path is
//! a registered root: `/home/x` has root segment `home`, `C:/src` has root segment `C:`.
//! A POSIX directory that merely looks like a drive, as in `/C:/x`, keeps its
//! leading separator in the root segment (`/C:`).

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Split a path into its segments, skipping empty and `.` components
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATORS)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Segments addressing `path` in the tree, see the module docs for root segments
pub fn tree_segments(path: &str) -> Vec<&str> {
    let mut parts = segments(path);
    if !path.starts_with(SEPARATORS) {
        return parts;
    }
    if let Some(first) = parts.first_mut() {
        if is_drive(first) {
            if let Some(start) = path.find(*first).and_then(|i| i.checked_sub(1)) {
                *first = &path[start..start + first.len() + 1];
            }
        }
    }
    parts
}

/// Whether the path is rooted at `/` or a drive letter
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with(SEPARATORS) {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || SEPARATORS.contains(&(bytes[2] as char)))
}

/// Absolute path of a top-level segment hanging off the tree root
pub fn root_child_path(segment: &str) -> String {
    if is_drive(segment) {
        segment.to_string()
    } else {
        format!("/{}", segment.trim_start_matches(SEPARATORS))
    }
}

/// Whether `child` names an entry directly inside `parent`
pub fn is_direct_child(parent: &str, child: &str) -> bool {
    let parent = segments(parent);
    let child = segments(child);
    child.len() == parent.len() + 1 && child.starts_with(&parent)
}

/// Absolute path of a named child below `parent`
pub fn child_absolute_path(parent: &str, name: &str) -> String {
    if parent.ends_with(SEPARATORS) {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Last segment of a path, or the empty string for a bare root
pub fn file_name(path: &str) -> &str {
    segments(path).last().copied().unwrap_or("")
}

/// Number of leading segments shared by two paths
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    segments(a)
        .iter()
        .zip(segments(b).iter())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Whether the segments of `path` starting at `offset` begin with `name`
///
/// True when the remainder is exactly `name` or `name` followed by a separator.
pub fn is_child_of_or_this(path: &str, offset: usize, name: &str) -> bool {
    let Some(rest) = path.get(offset..) else {
        return false;
    };
    let rest = rest.trim_start_matches(SEPARATORS);
    match rest.strip_prefix(name) {
        Some("") => true,
        Some(tail) => tail.starts_with(SEPARATORS),
        None => false,
    }
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
